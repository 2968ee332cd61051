// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Deterministic in-memory engine used by the unit tests.
//!
//! Ciphertexts are `[type tag] ++ 32-byte big-endian plaintext`, so tests can
//! decode what was sent to the engine. Re-encryption answers from a fixed
//! handle → plaintext table.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{Address, Bytes, U256};

use super::engine::{BoxFuture, EngineFactory, EngineParams, FheEngine};
use super::error::EngineError;
use super::types::ReencryptRequest;

pub(crate) const TAG_BOOL: u8 = 0x00;
pub(crate) const TAG_4: u8 = 0x01;
pub(crate) const TAG_8: u8 = 0x02;
pub(crate) const TAG_16: u8 = 0x03;
pub(crate) const TAG_32: u8 = 0x04;
pub(crate) const TAG_64: u8 = 0x05;
pub(crate) const TAG_128: u8 = 0x06;
pub(crate) const TAG_256: u8 = 0x08;
pub(crate) const TAG_ADDRESS: u8 = 0x07;

pub(crate) struct MockEngine {
    pub params: EngineParams,
    public_key: Bytes,
    fail_on: Option<U256>,
    with_proof: bool,
    plaintexts: HashMap<U256, U256>,
    pub encrypt_calls: AtomicUsize,
    pub last_request: Mutex<Option<ReencryptRequest>>,
}

impl MockEngine {
    fn ciphertext(&self, tag: u8, value: U256) -> Result<Vec<u8>, EngineError> {
        self.encrypt_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on == Some(value) {
            let message = format!("engine rejected plaintext {value}");
            return Err(EngineError::new(message));
        }
        let mut out = Vec::with_capacity(33);
        out.push(tag);
        out.extend_from_slice(&value.to_be_bytes::<32>());
        Ok(out)
    }
}

impl FheEngine for MockEngine {
    fn public_key(&self) -> Result<Bytes, EngineError> {
        Ok(self.public_key.clone())
    }

    fn encrypt_bool(&self, value: bool) -> Result<Vec<u8>, EngineError> {
        self.ciphertext(TAG_BOOL, U256::from(value as u8))
    }

    fn encrypt4(&self, value: u8) -> Result<Vec<u8>, EngineError> {
        self.ciphertext(TAG_4, U256::from(value))
    }

    fn encrypt8(&self, value: u8) -> Result<Vec<u8>, EngineError> {
        self.ciphertext(TAG_8, U256::from(value))
    }

    fn encrypt16(&self, value: u16) -> Result<Vec<u8>, EngineError> {
        self.ciphertext(TAG_16, U256::from(value))
    }

    fn encrypt32(&self, value: u32) -> Result<Vec<u8>, EngineError> {
        self.ciphertext(TAG_32, U256::from(value))
    }

    fn encrypt64(&self, value: u64) -> Result<Vec<u8>, EngineError> {
        self.ciphertext(TAG_64, U256::from(value))
    }

    fn encrypt128(&self, value: u128) -> Result<Vec<u8>, EngineError> {
        self.ciphertext(TAG_128, U256::from(value))
    }

    fn encrypt256(&self, value: U256) -> Result<Vec<u8>, EngineError> {
        self.ciphertext(TAG_256, value)
    }

    fn encrypt_address(&self, value: Address) -> Result<Vec<u8>, EngineError> {
        self.ciphertext(TAG_ADDRESS, U256::from_be_slice(value.as_slice()))
    }

    fn input_proof(&self, ciphertext: &[u8]) -> Result<Option<Bytes>, EngineError> {
        if self.with_proof {
            Ok(Some(Bytes::from(vec![0xEE, ciphertext[0]])))
        } else {
            Ok(None)
        }
    }

    fn reencrypt<'a>(
        &'a self,
        request: &'a ReencryptRequest,
    ) -> BoxFuture<'a, Result<U256, EngineError>> {
        Box::pin(async move {
            *self.last_request.lock().unwrap() = Some(request.clone());
            if request.signature.is_empty() {
                return Err(EngineError::new("invalid signature"));
            }
            self.plaintexts
                .get(&request.handle)
                .copied()
                .ok_or_else(|| EngineError::new("unauthorized handle"))
        })
    }
}

/// Factory handing out [`MockEngine`]s. The public key, failure value and
/// per-call bootstrap delays are adjustable between initializations.
pub(crate) struct MockFactory {
    public_key: Mutex<Bytes>,
    fail_on: Option<U256>,
    with_proof: bool,
    plaintexts: HashMap<U256, U256>,
    delays: Mutex<VecDeque<Duration>>,
    fail_bootstrap: AtomicBool,
    pub init_calls: AtomicUsize,
    pub engines: Mutex<Vec<Arc<MockEngine>>>,
}

impl MockFactory {
    pub fn new() -> Self {
        Self {
            public_key: Mutex::new(Bytes::from(vec![0x0A; 16])),
            fail_on: None,
            with_proof: false,
            plaintexts: HashMap::new(),
            delays: Mutex::new(VecDeque::new()),
            fail_bootstrap: AtomicBool::new(false),
            init_calls: AtomicUsize::new(0),
            engines: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(mut self, value: U256) -> Self {
        self.fail_on = Some(value);
        self
    }

    pub fn with_proofs(mut self) -> Self {
        self.with_proof = true;
        self
    }

    pub fn with_plaintext(mut self, handle: U256, value: U256) -> Self {
        self.plaintexts.insert(handle, value);
        self
    }

    pub fn set_public_key(&self, key: Bytes) {
        *self.public_key.lock().unwrap() = key;
    }

    pub fn push_delay(&self, delay: Duration) {
        self.delays.lock().unwrap().push_back(delay);
    }

    pub fn fail_next_bootstrap(&self) {
        self.fail_bootstrap.store(true, Ordering::SeqCst);
    }

    pub fn last_engine(&self) -> Arc<MockEngine> {
        self.engines
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no engine created")
    }

    /// Encryption primitives called on the newest engine.
    pub fn encrypt_calls(&self) -> usize {
        self.last_engine().encrypt_calls.load(Ordering::SeqCst)
    }

    /// Last re-encryption request the newest engine received.
    pub fn last_request(&self) -> ReencryptRequest {
        self.last_engine()
            .last_request
            .lock()
            .unwrap()
            .clone()
            .expect("no re-encryption request sent")
    }
}

impl EngineFactory for MockFactory {
    fn init_engine(&self) -> BoxFuture<'_, Result<(), EngineError>> {
        Box::pin(async move {
            self.init_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_bootstrap.swap(false, Ordering::SeqCst) {
                return Err(EngineError::new("failed to load engine"));
            }
            Ok(())
        })
    }

    fn create_instance<'a>(
        &'a self,
        params: &'a EngineParams,
    ) -> BoxFuture<'a, Result<Arc<dyn FheEngine>, EngineError>> {
        Box::pin(async move {
            let delay = self.delays.lock().unwrap().pop_front();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            let public_key = self.public_key.lock().unwrap().clone();
            let engine = Arc::new(MockEngine {
                params: params.clone(),
                public_key,
                fail_on: self.fail_on,
                with_proof: self.with_proof,
                plaintexts: self.plaintexts.clone(),
                encrypt_calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            });
            self.engines.lock().unwrap().push(engine.clone());
            Ok(engine as Arc<dyn FheEngine>)
        })
    }
}

/// Decode the plaintext a [`MockEngine`] embedded in a ciphertext.
pub(crate) fn decode_plaintext(ciphertext: &[u8]) -> (u8, U256) {
    (ciphertext[0], U256::from_be_slice(&ciphertext[1..]))
}
