// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership of the live engine instance.
//!
//! An [`InstanceManager`] holds at most one [`FhevmInstance`]. Callers may
//! create their own manager and inject it, or share the process-wide one
//! returned by [`InstanceManager::global`].
//!
//! ## Generations
//!
//! Every `initialize` and `reset` draws a ticket from a monotonic counter.
//! A bootstrap that finishes after a newer `initialize` or `reset` has been
//! applied is rejected with [`FhevmError::StaleInitialization`] instead of
//! overwriting newer state. Readers receive an `Arc` snapshot, so a
//! concurrent re-initialization never changes the instance under them.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use super::engine::{EngineFactory, FheEngine};
use super::error::FhevmError;
use super::types::PublicKey;
use crate::config::FhevmConfig;

/// Engine handle bound to one configuration, plus its public key.
pub struct FhevmInstance {
    engine: Arc<dyn FheEngine>,
    public_key: PublicKey,
    config: FhevmConfig,
    generation: u64,
    created_at: DateTime<Utc>,
}

impl FhevmInstance {
    pub fn engine(&self) -> &Arc<dyn FheEngine> {
        &self.engine
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn config(&self) -> &FhevmConfig {
        &self.config
    }

    pub fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    /// Generation ticket under which this instance was installed.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl fmt::Debug for FhevmInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FhevmInstance")
            .field("config", &self.config)
            .field("public_key", &self.public_key)
            .field("generation", &self.generation)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

struct Slot {
    generation: u64,
    instance: Option<Arc<FhevmInstance>>,
}

/// Holder of the current [`FhevmInstance`].
pub struct InstanceManager {
    next_generation: AtomicU64,
    slot: RwLock<Slot>,
}

impl InstanceManager {
    pub fn new() -> Self {
        Self {
            next_generation: AtomicU64::new(0),
            slot: RwLock::new(Slot {
                generation: 0,
                instance: None,
            }),
        }
    }

    /// Process-wide manager, for callers that want a single shared instance.
    pub fn global() -> Arc<InstanceManager> {
        static GLOBAL: OnceLock<Arc<InstanceManager>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(InstanceManager::new())))
    }

    /// Bootstrap the engine for `config` and install the new instance,
    /// replacing any existing one.
    ///
    /// Always performs a fresh bootstrap; deduplication of repeated calls is
    /// the caller's concern (see `FhevmClient::init`).
    pub async fn initialize(
        &self,
        factory: &dyn EngineFactory,
        config: FhevmConfig,
    ) -> Result<Arc<FhevmInstance>, FhevmError> {
        let generation = self.draw_generation();
        tracing::info!(
            generation,
            chain_id = config.chain_id,
            gateway = %config.gateway_address,
            "Bootstrapping FHEVM instance"
        );

        factory.init_engine().await?;
        let params = config.engine_params();
        let engine = factory.create_instance(&params).await?;
        let public_key = PublicKey::unsigned(engine.public_key()?);

        let instance = Arc::new(FhevmInstance {
            engine,
            public_key,
            config,
            generation,
            created_at: Utc::now(),
        });

        self.install(instance)
    }

    /// Install an already-built instance under its own generation ticket.
    fn install(&self, instance: Arc<FhevmInstance>) -> Result<Arc<FhevmInstance>, FhevmError> {
        let mut slot = self.write_slot();
        if instance.generation < slot.generation {
            tracing::warn!(
                generation = instance.generation,
                current = slot.generation,
                "Discarding stale FHEVM initialization"
            );
            return Err(FhevmError::StaleInitialization {
                generation: instance.generation,
                current: slot.generation,
            });
        }

        slot.generation = instance.generation;
        slot.instance = Some(instance.clone());
        tracing::info!(
            generation = instance.generation,
            chain_id = instance.chain_id(),
            "FHEVM instance ready"
        );
        Ok(instance)
    }

    /// Current instance, or [`FhevmError::NotInitialized`].
    pub fn get(&self) -> Result<Arc<FhevmInstance>, FhevmError> {
        self.read_slot()
            .instance
            .clone()
            .ok_or(FhevmError::NotInitialized)
    }

    pub fn has(&self) -> bool {
        self.read_slot().instance.is_some()
    }

    /// Drop the current instance. Safe to call when none exists. Bootstraps
    /// still in flight when this runs will be rejected as stale.
    pub fn reset(&self) {
        let generation = self.draw_generation();
        let mut slot = self.write_slot();
        slot.generation = generation;
        slot.instance = None;
        tracing::debug!(generation, "FHEVM instance reset");
    }

    /// Generation of the last applied `initialize` or `reset`.
    pub fn generation(&self) -> u64 {
        self.read_slot().generation
    }

    fn draw_generation(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn read_slot(&self) -> RwLockReadGuard<'_, Slot> {
        self.slot.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_slot(&self) -> RwLockWriteGuard<'_, Slot> {
        self.slot.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InstanceManager {
    fn default() -> Self {
        Self::new()
    }
}
