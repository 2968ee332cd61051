// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! High-level client over one FHEVM configuration.
//!
//! `init()` bootstraps the engine once; every other operation fails with
//! [`FhevmError::ClientNotInitialized`] until it has succeeded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::Eip712Domain;

use super::encryption;
use super::engine::EngineFactory;
use super::error::FhevmError;
use super::instance::{FhevmInstance, InstanceManager};
use super::permit::{self, NoopPermitStore, PermitSigner, PermitStore};
use super::types::{
    DecryptedValue, EncryptedType, EncryptedValue, PermitSignature, PublicKey, ReencryptRequest,
};
use crate::config::FhevmConfig;

/// Stateful facade bundling configuration, engine factory, instance manager
/// and permit storage.
///
/// The flag set by `init` is not a lock: two overlapping first calls both
/// bootstrap, and the manager keeps the newest instance.
pub struct FhevmClient {
    config: FhevmConfig,
    factory: Arc<dyn EngineFactory>,
    manager: Arc<InstanceManager>,
    permits: Arc<dyn PermitStore>,
    initialized: AtomicBool,
}

impl FhevmClient {
    /// Client backed by the process-wide [`InstanceManager`].
    pub fn new(config: FhevmConfig, factory: Arc<dyn EngineFactory>) -> Self {
        Self::with_manager(config, factory, InstanceManager::global())
    }

    /// Client backed by an injected manager.
    pub fn with_manager(
        config: FhevmConfig,
        factory: Arc<dyn EngineFactory>,
        manager: Arc<InstanceManager>,
    ) -> Self {
        Self {
            config,
            factory,
            manager,
            permits: Arc::new(NoopPermitStore),
            initialized: AtomicBool::new(false),
        }
    }

    /// Replace the permit store (defaults to [`NoopPermitStore`]).
    pub fn with_permit_store(mut self, permits: Arc<dyn PermitStore>) -> Self {
        self.permits = permits;
        self
    }

    pub fn config(&self) -> &FhevmConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Bootstrap the engine. A no-op after the first success.
    pub async fn init(&self) -> Result<(), FhevmError> {
        if self.is_initialized() {
            return Ok(());
        }
        self.manager
            .initialize(self.factory.as_ref(), self.config.clone())
            .await?;
        self.initialized.store(true, Ordering::Release);
        Ok(())
    }

    fn instance(&self) -> Result<Arc<FhevmInstance>, FhevmError> {
        if !self.is_initialized() {
            return Err(FhevmError::ClientNotInitialized);
        }
        self.manager.get()
    }

    pub async fn encrypt(
        &self,
        value: U256,
        ty: EncryptedType,
    ) -> Result<EncryptedValue, FhevmError> {
        let instance = self.instance()?;
        encryption::encrypt_value(&instance, value, ty).await
    }

    pub async fn encrypt_batch(
        &self,
        values: &[U256],
        ty: EncryptedType,
    ) -> Result<Vec<EncryptedValue>, FhevmError> {
        let instance = self.instance()?;
        encryption::encrypt_batch(&instance, values, ty).await
    }

    /// Sign a permit for `user_address` on `contract_address` and keep it in
    /// the permit store.
    pub async fn create_permit<S>(
        &self,
        contract_address: Address,
        user_address: Address,
        signer: &S,
    ) -> Result<PermitSignature, FhevmError>
    where
        S: PermitSigner + ?Sized,
    {
        let instance = self.instance()?;
        let permit =
            permit::create_permit(&instance, contract_address, user_address, signer).await?;
        self.permits.put(&permit);
        Ok(permit)
    }

    /// Previously issued permit for (contract, user), if the store kept one.
    pub fn permit(
        &self,
        contract_address: Address,
        user_address: Address,
    ) -> Option<PermitSignature> {
        self.permits.get(contract_address, user_address)
    }

    pub fn clear_permits(&self) {
        self.permits.clear();
    }

    pub async fn reencrypt(
        &self,
        handle: U256,
        contract_address: Address,
        user_address: Address,
        signature: Bytes,
    ) -> Result<U256, FhevmError> {
        let instance = self.instance()?;
        let request = encryption::reencrypt_request(
            &instance,
            handle,
            contract_address,
            user_address,
            signature,
        );
        encryption::reencrypt_value(&instance, &request).await
    }

    /// Re-encrypt `handle` with an issued permit. The request carries the
    /// public key the permit was signed over.
    pub async fn decrypt_with_permit(
        &self,
        handle: U256,
        permit: &PermitSignature,
    ) -> Result<DecryptedValue, FhevmError> {
        let instance = self.instance()?;
        let request = ReencryptRequest {
            handle,
            contract_address: permit.contract_address,
            user_address: permit.user_address,
            signature: permit.signature.clone(),
            public_key: permit.public_key.clone(),
        };
        let value = encryption::reencrypt_value(&instance, &request).await?;
        Ok(DecryptedValue {
            value,
            encrypted: handle,
        })
    }

    /// Plain decryption. Always fails once initialized; see
    /// [`decrypt_with_permit`](Self::decrypt_with_permit).
    pub async fn decrypt(
        &self,
        handle: U256,
        contract_address: Address,
        user_address: Address,
    ) -> Result<DecryptedValue, FhevmError> {
        let instance = self.instance()?;
        encryption::decrypt_value(&instance, handle, contract_address, user_address).await
    }

    pub fn public_key(&self) -> Result<PublicKey, FhevmError> {
        Ok(self.instance()?.public_key().clone())
    }

    pub fn eip712_domain(&self, contract_address: Address) -> Result<Eip712Domain, FhevmError> {
        let instance = self.instance()?;
        Ok(permit::eip712_domain(instance.chain_id(), contract_address))
    }
}
