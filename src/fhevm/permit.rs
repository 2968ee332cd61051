// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EIP-712 permits authorizing re-encryption.
//!
//! A permit binds a user, a contract and the instance's public key under the
//! `Authorization token` domain of the target contract:
//!
//! ```text
//! Permit(address issuer,address contract,bytes publicKey)
//! ```
//!
//! The signature comes from an injected [`PermitSigner`] (wallet, local key,
//! remote signer). It is not verified here; the verifying contract does that.

use std::borrow::Cow;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use alloy::dyn_abi::TypedData;
use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::Eip712Domain;
use lru::LruCache;
use serde_json::json;

use super::engine::BoxFuture;
use super::error::{FhevmError, SignerError};
use super::instance::FhevmInstance;
use super::types::PermitSignature;

/// EIP-712 domain name used by FHEVM contracts for re-encryption permits.
pub const PERMIT_DOMAIN_NAME: &str = "Authorization token";

/// EIP-712 domain version.
pub const PERMIT_DOMAIN_VERSION: &str = "1";

/// Primary type of the permit message.
pub const PERMIT_PRIMARY_TYPE: &str = "Permit";

/// Capability that signs a permit's typed data.
///
/// This is the only suspension point of permit creation. Errors are
/// propagated to the caller unchanged.
pub trait PermitSigner: Send + Sync {
    fn sign_permit<'a>(
        &'a self,
        typed_data: &'a TypedData,
    ) -> BoxFuture<'a, Result<Bytes, SignerError>>;
}

/// EIP-712 domain of `contract_address` on `chain_id`.
pub fn eip712_domain(chain_id: u64, contract_address: Address) -> Eip712Domain {
    Eip712Domain::new(
        Some(Cow::Borrowed(PERMIT_DOMAIN_NAME)),
        Some(Cow::Borrowed(PERMIT_DOMAIN_VERSION)),
        Some(U256::from(chain_id)),
        Some(contract_address),
        None,
    )
}

/// Full typed-data payload (domain, types, primary type, message) for a
/// permit, in the shape wallets accept for `eth_signTypedData_v4`.
pub fn permit_typed_data(
    chain_id: u64,
    contract_address: Address,
    user_address: Address,
    public_key: &Bytes,
) -> Result<TypedData, FhevmError> {
    let payload = json!({
        "types": {
            "EIP712Domain": [
                { "name": "name", "type": "string" },
                { "name": "version", "type": "string" },
                { "name": "chainId", "type": "uint256" },
                { "name": "verifyingContract", "type": "address" },
            ],
            "Permit": [
                { "name": "issuer", "type": "address" },
                { "name": "contract", "type": "address" },
                { "name": "publicKey", "type": "bytes" },
            ],
        },
        "primaryType": PERMIT_PRIMARY_TYPE,
        "domain": {
            "name": PERMIT_DOMAIN_NAME,
            "version": PERMIT_DOMAIN_VERSION,
            "chainId": chain_id,
            "verifyingContract": contract_address,
        },
        "message": {
            "issuer": user_address,
            "contract": contract_address,
            "publicKey": public_key,
        },
    });

    serde_json::from_value(payload).map_err(|e| FhevmError::TypedData(e.to_string()))
}

/// Build a permit for `user_address` on `contract_address` and have `signer`
/// sign it. The permit embeds the public key current at call time.
pub async fn create_permit<S>(
    instance: &FhevmInstance,
    contract_address: Address,
    user_address: Address,
    signer: &S,
) -> Result<PermitSignature, FhevmError>
where
    S: PermitSigner + ?Sized,
{
    let public_key = instance.public_key().key.clone();
    let typed_data = permit_typed_data(
        instance.chain_id(),
        contract_address,
        user_address,
        &public_key,
    )?;

    let signature = signer.sign_permit(&typed_data).await?;
    tracing::info!(
        contract = %contract_address,
        user = %user_address,
        chain_id = instance.chain_id(),
        "Permit signed"
    );

    Ok(PermitSignature {
        contract_address,
        user_address,
        signature,
        public_key,
    })
}

// =============================================================================
// Permit Storage
// =============================================================================

/// Storage for issued permits, keyed by (contract, user).
pub trait PermitStore: Send + Sync {
    fn get(&self, contract_address: Address, user_address: Address) -> Option<PermitSignature>;
    fn put(&self, permit: &PermitSignature);
    fn clear(&self);
}

/// Store that keeps nothing; permits are created on demand.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPermitStore;

impl PermitStore for NoopPermitStore {
    fn get(&self, _contract_address: Address, _user_address: Address) -> Option<PermitSignature> {
        None
    }

    fn put(&self, _permit: &PermitSignature) {}

    fn clear(&self) {}
}

struct CacheEntry {
    permit: PermitSignature,
    inserted_at: Instant,
}

/// Bounded in-process LRU of permits with a time-to-live.
///
/// A permit is bound to the public key it embeds, so entries whose key no
/// longer matches the instance should be dropped with [`PermitStore::clear`]
/// after re-initialization.
pub struct CachedPermitStore {
    cache: Mutex<LruCache<(Address, Address), CacheEntry>>,
    ttl: Duration,
}

impl CachedPermitStore {
    /// - `capacity`: max number of (contract, user) pairs kept.
    /// - `ttl`: time-to-live of each entry.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }
}

impl PermitStore for CachedPermitStore {
    fn get(&self, contract_address: Address, user_address: Address) -> Option<PermitSignature> {
        let key = (contract_address, user_address);
        let mut cache = self.cache.lock().ok()?;
        if let Some(entry) = cache.get(&key) {
            if entry.inserted_at.elapsed() < self.ttl {
                return Some(entry.permit.clone());
            }
            cache.pop(&key);
        }
        None
    }

    fn put(&self, permit: &PermitSignature) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(
                (permit.contract_address, permit.user_address),
                CacheEntry {
                    permit: permit.clone(),
                    inserted_at: Instant::now(),
                },
            );
        }
    }

    fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }
}
