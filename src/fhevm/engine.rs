// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Port to the external FHE engine.
//!
//! The engine owns all cryptography: ciphertext generation, key material and
//! proof-checked re-encryption through the gateway. This crate only arranges
//! calls into it, so the engine is consumed through two traits:
//!
//! - [`EngineFactory`]: one-time library bootstrap and instance creation
//! - [`FheEngine`]: a live handle bound to one chain/gateway pair
//!
//! Encryption primitives are synchronous (they are CPU-bound and run on the
//! blocking pool); re-encryption is a network round trip and returns a
//! boxed future so the traits stay object-safe.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use alloy::primitives::{Address, Bytes, U256};
use url::Url;

use super::error::EngineError;
use super::types::ReencryptRequest;

/// Boxed, sendable future returned by engine calls that cross the network.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Parameters passed to the engine when creating an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineParams {
    /// Chain the instance encrypts for.
    pub chain_id: u64,
    /// Gateway contract that signs the network public key.
    pub public_key_verifier: Address,
    /// Gateway endpoint, when it differs from the engine default.
    pub gateway_url: Option<Url>,
}

/// Live engine handle.
pub trait FheEngine: Send + Sync {
    /// Network public key, as raw bytes.
    fn public_key(&self) -> Result<Bytes, EngineError>;

    fn encrypt_bool(&self, value: bool) -> Result<Vec<u8>, EngineError>;

    /// 4-bit values travel in the low nibble of a byte.
    fn encrypt4(&self, value: u8) -> Result<Vec<u8>, EngineError>;

    fn encrypt8(&self, value: u8) -> Result<Vec<u8>, EngineError>;

    fn encrypt16(&self, value: u16) -> Result<Vec<u8>, EngineError>;

    fn encrypt32(&self, value: u32) -> Result<Vec<u8>, EngineError>;

    fn encrypt64(&self, value: u64) -> Result<Vec<u8>, EngineError>;

    fn encrypt128(&self, value: u128) -> Result<Vec<u8>, EngineError>;

    fn encrypt256(&self, value: U256) -> Result<Vec<u8>, EngineError>;

    fn encrypt_address(&self, value: Address) -> Result<Vec<u8>, EngineError>;

    /// Input proof attesting a ciphertext's validity, for engines that
    /// require one alongside the payload.
    fn input_proof(&self, _ciphertext: &[u8]) -> Result<Option<Bytes>, EngineError> {
        Ok(None)
    }

    /// Re-encrypt the ciphertext behind `request.handle` for the requester
    /// and return its plaintext.
    fn reencrypt<'a>(
        &'a self,
        request: &'a ReencryptRequest,
    ) -> BoxFuture<'a, Result<U256, EngineError>>;
}

/// Bootstrap side of the engine library.
pub trait EngineFactory: Send + Sync {
    /// Load the engine library (WASM modules, key caches...).
    fn init_engine(&self) -> BoxFuture<'_, Result<(), EngineError>>;

    /// Create an engine handle for one chain/gateway pair.
    fn create_instance<'a>(
        &'a self,
        params: &'a EngineParams,
    ) -> BoxFuture<'a, Result<Arc<dyn FheEngine>, EngineError>>;
}
