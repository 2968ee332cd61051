// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! FHEVM client layer.
//!
//! - [`types`]: encrypted type registry and value types
//! - [`engine`]: port to the external FHE engine
//! - [`instance`]: ownership of the live engine instance
//! - [`encryption`]: encryption and re-encryption
//! - [`permit`]: EIP-712 permits and their storage
//! - [`signing`]: local and closure-based permit signers
//! - [`client`]: the [`FhevmClient`] facade

pub mod client;
pub mod encryption;
pub mod engine;
pub mod error;
pub mod instance;
pub mod operations;
pub mod permit;
pub mod signing;
pub mod types;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use client::FhevmClient;
pub use engine::{EngineFactory, EngineParams, FheEngine};
pub use error::{EngineError, FhevmError, SignerError};
pub use instance::{FhevmInstance, InstanceManager};
pub use operations::{FheOperation, OperationCategory};
pub use permit::{CachedPermitStore, NoopPermitStore, PermitSigner, PermitStore};
pub use signing::{signer_from_hex, signer_from_pem, signer_from_pem_file, SignerFn};
pub use types::{
    validate_value_for_type, DecryptedValue, EncryptedType, EncryptedValue, PermitSignature,
    PublicKey, ReencryptRequest,
};
