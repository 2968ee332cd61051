// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Encrypted-value codec and re-encryption requests.
//!
//! Encryption dispatches on [`EncryptedType`] to the matching engine
//! primitive. Plaintexts are range-checked against the type registry before
//! the engine is touched, so an out-of-range value fails fast with
//! [`FhevmError::ValueOutOfRange`] instead of whatever the engine would do.

use alloy::primitives::{Address, Bytes, U256};
use tokio::task::JoinSet;

use super::engine::FheEngine;
use super::error::FhevmError;
use super::instance::FhevmInstance;
use super::types::{
    validate_value_for_type, DecryptedValue, EncryptedType, EncryptedValue, ReencryptRequest,
};

/// Encrypt one plaintext on the calling thread.
fn encrypt_with(
    engine: &dyn FheEngine,
    value: U256,
    ty: EncryptedType,
) -> Result<EncryptedValue, FhevmError> {
    validate_value_for_type(value, ty)?;

    // In range, so the narrowing below is lossless.
    let limbs = value.as_limbs();
    let data = match ty {
        EncryptedType::Ebool => engine.encrypt_bool(!value.is_zero()),
        EncryptedType::Euint4 => engine.encrypt4(limbs[0] as u8),
        EncryptedType::Euint8 => engine.encrypt8(limbs[0] as u8),
        EncryptedType::Euint16 => engine.encrypt16(limbs[0] as u16),
        EncryptedType::Euint32 => engine.encrypt32(limbs[0] as u32),
        EncryptedType::Euint64 => engine.encrypt64(limbs[0]),
        EncryptedType::Euint128 => engine.encrypt128(((limbs[1] as u128) << 64) | limbs[0] as u128),
        EncryptedType::Euint256 => engine.encrypt256(value),
        EncryptedType::Eaddress => {
            engine.encrypt_address(Address::from_slice(&value.to_be_bytes::<32>()[12..]))
        }
    }?;

    let proof = engine.input_proof(&data)?;
    tracing::debug!(encrypted_type = %ty, bytes = data.len(), "Encrypted value");

    let encrypted = EncryptedValue::new(data, ty);
    Ok(match proof {
        Some(proof) => encrypted.with_input_proof(proof),
        None => encrypted,
    })
}

/// Encrypt `value` as `ty` with the instance's engine.
///
/// Runs on the blocking pool: engine primitives are CPU-bound.
pub async fn encrypt_value(
    instance: &FhevmInstance,
    value: U256,
    ty: EncryptedType,
) -> Result<EncryptedValue, FhevmError> {
    validate_value_for_type(value, ty)?;
    let engine = instance.engine().clone();
    tokio::task::spawn_blocking(move || encrypt_with(engine.as_ref(), value, ty))
        .await
        .map_err(|e| FhevmError::Task(e.to_string()))?
}

/// Encrypt every value as `ty`, concurrently.
///
/// All-or-nothing: the first failure is returned, outstanding tasks are
/// aborted and no partial result is produced. Output order matches input
/// order. An empty input returns immediately without touching the engine.
pub async fn encrypt_batch(
    instance: &FhevmInstance,
    values: &[U256],
    ty: EncryptedType,
) -> Result<Vec<EncryptedValue>, FhevmError> {
    if values.is_empty() {
        return Ok(Vec::new());
    }
    for value in values {
        validate_value_for_type(*value, ty)?;
    }

    let mut tasks = JoinSet::new();
    for (index, value) in values.iter().copied().enumerate() {
        let engine = instance.engine().clone();
        tasks.spawn_blocking(move || (index, encrypt_with(engine.as_ref(), value, ty)));
    }

    let mut slots: Vec<Option<EncryptedValue>> = vec![None; values.len()];
    while let Some(joined) = tasks.join_next().await {
        let outcome = joined
            .map_err(|e| FhevmError::Task(e.to_string()))
            .and_then(|(index, result)| result.map(|encrypted| (index, encrypted)));

        match outcome {
            Ok((index, encrypted)) => slots[index] = Some(encrypted),
            Err(err) => {
                tasks.abort_all();
                tracing::warn!(
                    encrypted_type = %ty,
                    count = values.len(),
                    error = %err,
                    "Batch encryption failed"
                );
                return Err(err);
            }
        }
    }

    Ok(slots.into_iter().flatten().collect())
}

/// Build the re-encryption request for `handle`, embedding the instance's
/// current public key.
pub fn reencrypt_request(
    instance: &FhevmInstance,
    handle: U256,
    contract_address: Address,
    user_address: Address,
    signature: Bytes,
) -> ReencryptRequest {
    ReencryptRequest {
        handle,
        contract_address,
        user_address,
        signature,
        public_key: instance.public_key().key.clone(),
    }
}

/// Ask the engine to re-encrypt a handle for the requester and return the
/// plaintext. Engine failures are passed through untouched.
pub async fn reencrypt_value(
    instance: &FhevmInstance,
    request: &ReencryptRequest,
) -> Result<U256, FhevmError> {
    let value = instance.engine().reencrypt(request).await?;
    tracing::debug!(
        handle = %request.handle,
        contract = %request.contract_address,
        user = %request.user_address,
        "Re-encryption completed"
    );
    Ok(value)
}

/// Plain decryption without a permit. Always fails: use the permit flow
/// (`create_permit` then [`reencrypt_value`]) instead.
pub async fn decrypt_value(
    _instance: &FhevmInstance,
    _handle: U256,
    _contract_address: Address,
    _user_address: Address,
) -> Result<DecryptedValue, FhevmError> {
    Err(FhevmError::DecryptUnsupported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FhevmConfig;
    use crate::fhevm::instance::InstanceManager;
    use crate::fhevm::testing::{self, MockFactory};
    use crate::fhevm::utils::hex_to_bytes;
    use std::sync::Arc;

    async fn instance_for(factory: &MockFactory) -> Arc<FhevmInstance> {
        let config = FhevmConfig::new(Address::repeat_byte(0x79), 11155111);
        InstanceManager::new()
            .initialize(factory, config)
            .await
            .unwrap()
    }

    fn samples(ty: EncryptedType) -> Vec<U256> {
        let max = ty.max_value();
        vec![U256::ZERO, max >> 1, max]
    }

    #[tokio::test]
    async fn every_type_encrypts_in_range_values() {
        let factory = MockFactory::new();
        let instance = instance_for(&factory).await;

        for ty in EncryptedType::ALL {
            for value in samples(ty) {
                let encrypted = encrypt_value(&instance, value, ty).await.unwrap();
                assert_eq!(encrypted.encrypted_type, ty);
                assert_eq!(hex_to_bytes(&encrypted.hex).unwrap(), encrypted.data);
                assert_eq!(encrypted.hex, encrypted.hex.to_lowercase());

                let (_, plaintext) = testing::decode_plaintext(&encrypted.data);
                assert_eq!(plaintext, value, "{ty} lost {value}");
            }
        }
    }

    #[tokio::test]
    async fn dispatch_uses_matching_primitive() {
        let factory = MockFactory::new();
        let instance = instance_for(&factory).await;
        let expected = [
            (EncryptedType::Ebool, testing::TAG_BOOL),
            (EncryptedType::Euint4, testing::TAG_4),
            (EncryptedType::Euint8, testing::TAG_8),
            (EncryptedType::Euint16, testing::TAG_16),
            (EncryptedType::Euint32, testing::TAG_32),
            (EncryptedType::Euint64, testing::TAG_64),
            (EncryptedType::Euint128, testing::TAG_128),
            (EncryptedType::Euint256, testing::TAG_256),
            (EncryptedType::Eaddress, testing::TAG_ADDRESS),
        ];

        let one = U256::from(1u8);
        for (ty, tag) in expected {
            let encrypted = encrypt_value(&instance, one, ty).await.unwrap();
            assert_eq!(encrypted.data[0], tag, "wrong primitive for {ty}");
        }
    }

    #[tokio::test]
    async fn out_of_range_fails_before_engine() {
        let factory = MockFactory::new();
        let instance = instance_for(&factory).await;

        let err = encrypt_value(&instance, U256::from(16u8), EncryptedType::Euint4)
            .await
            .unwrap_err();
        match err {
            FhevmError::ValueOutOfRange { ty, .. } => assert_eq!(ty, EncryptedType::Euint4),
            other => panic!("unexpected error: {other}"),
        }

        let err = encrypt_value(&instance, U256::from(2u8), EncryptedType::Ebool)
            .await
            .unwrap_err();
        assert!(matches!(err, FhevmError::ValueOutOfRange { .. }));

        assert_eq!(factory.encrypt_calls(), 0);
    }

    #[tokio::test]
    async fn engine_failure_propagates() {
        let factory = MockFactory::new().failing_on(U256::from(13u8));
        let instance = instance_for(&factory).await;

        let err = encrypt_value(&instance, U256::from(13u8), EncryptedType::Euint8)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Engine error: engine rejected plaintext 13"
        );
    }

    #[tokio::test]
    async fn input_proof_is_attached_when_engine_provides_one() {
        let factory = MockFactory::new().with_proofs();
        let instance = instance_for(&factory).await;

        let encrypted = encrypt_value(&instance, U256::from(42u8), EncryptedType::Euint64)
            .await
            .unwrap();
        assert_eq!(
            encrypted.input_proof,
            Some(Bytes::from(vec![0xEE, testing::TAG_64]))
        );
    }

    #[tokio::test]
    async fn empty_batch_skips_engine() {
        let factory = MockFactory::new();
        let instance = instance_for(&factory).await;

        let out = encrypt_batch(&instance, &[], EncryptedType::Euint32)
            .await
            .unwrap();
        assert!(out.is_empty());
        assert_eq!(factory.encrypt_calls(), 0);
    }

    #[tokio::test]
    async fn batch_preserves_input_order() {
        let factory = MockFactory::new();
        let instance = instance_for(&factory).await;
        let values: Vec<U256> = (1..=5u32).map(|n| U256::from(n * 10)).collect();

        let out = encrypt_batch(&instance, &values, EncryptedType::Euint32)
            .await
            .unwrap();

        let decoded: Vec<U256> = out
            .iter()
            .map(|e| testing::decode_plaintext(&e.data).1)
            .collect();
        assert_eq!(decoded, values);
    }

    #[tokio::test]
    async fn batch_fails_as_a_whole() {
        let factory = MockFactory::new().failing_on(U256::from(2u8));
        let instance = instance_for(&factory).await;
        let values = [U256::from(1u8), U256::from(2u8), U256::from(3u8)];
        let ty = EncryptedType::Euint8;

        let result = encrypt_batch(&instance, &values, ty).await;

        assert!(matches!(result, Err(FhevmError::Engine(_))));
    }

    #[tokio::test]
    async fn batch_out_of_range_rejects_before_spawning() {
        let factory = MockFactory::new();
        let instance = instance_for(&factory).await;
        let values = [U256::from(1u8), U256::from(300u16)];
        let ty = EncryptedType::Euint8;

        let result = encrypt_batch(&instance, &values, ty).await;

        assert!(matches!(result, Err(FhevmError::ValueOutOfRange { .. })));
        assert_eq!(factory.encrypt_calls(), 0);
    }

    #[tokio::test]
    async fn reencrypt_is_deterministic_and_embeds_public_key() {
        let handle = U256::from(0xBEEFu32);
        let factory = MockFactory::new().with_plaintext(handle, U256::from(42u8));
        let instance = instance_for(&factory).await;
        let request = reencrypt_request(
            &instance,
            handle,
            Address::repeat_byte(0xAA),
            Address::repeat_byte(0xBB),
            Bytes::from(vec![0x01; 65]),
        );

        let first = reencrypt_value(&instance, &request).await.unwrap();
        let second = reencrypt_value(&instance, &request).await.unwrap();

        assert_eq!(first, U256::from(42u8));
        assert_eq!(first, second);
        let sent = factory.last_request();
        assert_eq!(sent.public_key, instance.public_key().key);
    }

    #[tokio::test]
    async fn reencrypt_passes_engine_errors_through() {
        let factory = MockFactory::new();
        let instance = instance_for(&factory).await;
        let request = reencrypt_request(
            &instance,
            U256::from(7u8),
            Address::repeat_byte(0xAA),
            Address::repeat_byte(0xBB),
            Bytes::from(vec![0x01; 65]),
        );

        let err = reencrypt_value(&instance, &request).await.unwrap_err();
        assert_eq!(err.to_string(), "Engine error: unauthorized handle");
    }

    #[tokio::test]
    async fn plain_decrypt_always_fails() {
        let handle = U256::from(1u8);
        let factory = MockFactory::new().with_plaintext(handle, U256::from(5u8));
        let instance = instance_for(&factory).await;

        for handle in [U256::ZERO, handle, U256::MAX] {
            let err = decrypt_value(
                &instance,
                handle,
                Address::repeat_byte(0xAA),
                Address::repeat_byte(0xBB),
            )
            .await
            .unwrap_err();
            assert!(matches!(err, FhevmError::DecryptUnsupported));
        }
    }
}
