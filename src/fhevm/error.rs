// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Errors surfaced by the FHEVM client layer.
//!
//! Nothing here is retried. Upstream failures from the engine or the signer
//! are carried verbatim so callers can present them as-is.

use alloy::primitives::U256;

use super::types::EncryptedType;

/// Opaque failure reported by the external FHE engine or gateway.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct EngineError(pub String);

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Failure reported by a permit signer (declined prompt, locked wallet...).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct SignerError(pub String);

impl SignerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors that can occur in the FHEVM client layer.
#[derive(Debug, thiserror::Error)]
pub enum FhevmError {
    #[error("FHEVM instance not initialized. Call initialize() first.")]
    NotInitialized,

    #[error("FhevmClient not initialized. Call init() first.")]
    ClientNotInitialized,

    #[error("Unsupported encrypted type: {0}")]
    UnsupportedType(String),

    #[error("Value {value} does not fit in {ty} (max {max})", max = .ty.max_value())]
    ValueOutOfRange { value: U256, ty: EncryptedType },

    #[error(
        "Decryption requires gateway integration. Use reencrypt() with a permit for client-side decryption."
    )]
    DecryptUnsupported,

    #[error("Stale initialization (generation {generation}) superseded by generation {current}")]
    StaleInitialization { generation: u64, current: u64 },

    #[error("Failed to build EIP-712 permit: {0}")]
    TypedData(String),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Signer error: {0}")]
    Signer(#[from] SignerError),

    #[error("Encryption task failed: {0}")]
    Task(String),
}
