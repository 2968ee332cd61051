// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! FHEVM data model: ciphertext type registry and the values exchanged with
//! the engine, the signer and the gateway.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::FhevmError;

// =============================================================================
// Type Registry
// =============================================================================

/// Closed set of ciphertext kinds supported by the FHEVM.
///
/// Wire names follow the Solidity library (`ebool`, `euint8`, `eaddress`...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EncryptedType {
    Ebool,
    Euint4,
    Euint8,
    Euint16,
    Euint32,
    Euint64,
    Euint128,
    Euint256,
    Eaddress,
}

impl EncryptedType {
    /// Every supported type, in registry order.
    pub const ALL: [EncryptedType; 9] = [
        EncryptedType::Ebool,
        EncryptedType::Euint4,
        EncryptedType::Euint8,
        EncryptedType::Euint16,
        EncryptedType::Euint32,
        EncryptedType::Euint64,
        EncryptedType::Euint128,
        EncryptedType::Euint256,
        EncryptedType::Eaddress,
    ];

    /// Types eligible for [`EncryptedType::recommend`], smallest domain first.
    /// `eaddress` is not part of the chain.
    const RECOMMENDATION_CHAIN: [EncryptedType; 8] = [
        EncryptedType::Ebool,
        EncryptedType::Euint4,
        EncryptedType::Euint8,
        EncryptedType::Euint16,
        EncryptedType::Euint32,
        EncryptedType::Euint64,
        EncryptedType::Euint128,
        EncryptedType::Euint256,
    ];

    /// Default type used when a caller does not name one.
    pub const DEFAULT: EncryptedType = EncryptedType::Euint64;

    /// Wire name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            EncryptedType::Ebool => "ebool",
            EncryptedType::Euint4 => "euint4",
            EncryptedType::Euint8 => "euint8",
            EncryptedType::Euint16 => "euint16",
            EncryptedType::Euint32 => "euint32",
            EncryptedType::Euint64 => "euint64",
            EncryptedType::Euint128 => "euint128",
            EncryptedType::Euint256 => "euint256",
            EncryptedType::Eaddress => "eaddress",
        }
    }

    /// Bit width of the plaintext domain (1 for `ebool`).
    pub fn bits(&self) -> usize {
        match self {
            EncryptedType::Ebool => 1,
            EncryptedType::Euint4 => 4,
            EncryptedType::Euint8 => 8,
            EncryptedType::Euint16 => 16,
            EncryptedType::Euint32 => 32,
            EncryptedType::Euint64 => 64,
            EncryptedType::Euint128 => 128,
            EncryptedType::Euint256 => 256,
            EncryptedType::Eaddress => 160,
        }
    }

    /// Largest plaintext representable by this type.
    pub fn max_value(&self) -> U256 {
        U256::MAX >> (256 - self.bits())
    }

    /// Whether `value` lies inside `0..=max_value()`.
    pub fn contains(&self, value: U256) -> bool {
        value <= self.max_value()
    }

    /// Membership test of a wire name against the registry.
    pub fn is_valid(name: &str) -> bool {
        name.parse::<EncryptedType>().is_ok()
    }

    /// Smallest integer type whose domain contains `value`.
    pub fn recommend(value: U256) -> EncryptedType {
        Self::RECOMMENDATION_CHAIN
            .into_iter()
            .find(|ty| ty.contains(value))
            .unwrap_or(EncryptedType::Euint256)
    }

    /// Comma-separated list of every wire name, for error messages.
    pub fn supported_names() -> String {
        Self::ALL
            .iter()
            .map(|ty| ty.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for EncryptedType {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for EncryptedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EncryptedType {
    type Err = FhevmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| FhevmError::UnsupportedType(s.to_string()))
    }
}

/// Check that a plaintext fits the domain of `ty`.
pub fn validate_value_for_type(value: U256, ty: EncryptedType) -> Result<(), FhevmError> {
    if ty.contains(value) {
        Ok(())
    } else {
        Err(FhevmError::ValueOutOfRange { value, ty })
    }
}

// =============================================================================
// Values
// =============================================================================

/// Ciphertext produced by the engine for a single plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedValue {
    /// Raw payload as returned by the engine.
    #[serde(skip)]
    pub data: Vec<u8>,
    /// `0x`-prefixed lowercase hex of `data`.
    pub hex: String,
    /// Input proof, when the engine attaches one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_proof: Option<Bytes>,
    /// Type the plaintext was encrypted under.
    #[serde(rename = "type")]
    pub encrypted_type: EncryptedType,
}

impl EncryptedValue {
    pub fn new(data: Vec<u8>, encrypted_type: EncryptedType) -> Self {
        let hex = super::utils::bytes_to_hex(&data);
        Self {
            data,
            hex,
            input_proof: None,
            encrypted_type,
        }
    }

    pub fn with_input_proof(mut self, proof: Bytes) -> Self {
        self.input_proof = Some(proof);
        self
    }
}

/// Network public key used for encryption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    /// Key bytes (serialized as `0x` hex).
    pub key: Bytes,
    /// Gateway signature over the key. Empty until the gateway supplies one.
    pub signature: Bytes,
}

impl PublicKey {
    pub fn unsigned(key: Bytes) -> Self {
        Self {
            key,
            signature: Bytes::new(),
        }
    }
}

/// EIP-712 permit authorizing `user_address` to re-encrypt handles of
/// `contract_address` under `public_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitSignature {
    pub contract_address: Address,
    pub user_address: Address,
    pub signature: Bytes,
    pub public_key: Bytes,
}

/// Transient request handed to the engine's re-encryption primitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReencryptRequest {
    pub handle: U256,
    pub contract_address: Address,
    pub user_address: Address,
    pub signature: Bytes,
    pub public_key: Bytes,
}

/// Plaintext recovered through the permit flow, with the handle it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecryptedValue {
    pub value: U256,
    pub encrypted: U256,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_values_match_bit_widths() {
        assert_eq!(EncryptedType::Ebool.max_value(), U256::from(1u8));
        assert_eq!(EncryptedType::Euint4.max_value(), U256::from(15u8));
        assert_eq!(EncryptedType::Euint8.max_value(), U256::from(255u8));
        assert_eq!(EncryptedType::Euint16.max_value(), U256::from(u16::MAX));
        assert_eq!(EncryptedType::Euint32.max_value(), U256::from(u32::MAX));
        assert_eq!(EncryptedType::Euint64.max_value(), U256::from(u64::MAX));
        assert_eq!(EncryptedType::Euint128.max_value(), U256::from(u128::MAX));
        assert_eq!(EncryptedType::Euint256.max_value(), U256::MAX);
        assert_eq!(
            EncryptedType::Eaddress.max_value(),
            (U256::from(1u8) << 160) - U256::from(1u8)
        );
    }

    #[test]
    fn wire_names_round_trip() {
        for ty in EncryptedType::ALL {
            assert_eq!(ty.as_str().parse::<EncryptedType>().unwrap(), ty);
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty.as_str()));
        }
    }

    #[test]
    fn is_valid_rejects_unknown_names() {
        assert!(EncryptedType::is_valid("euint64"));
        assert!(EncryptedType::is_valid("eaddress"));
        assert!(!EncryptedType::is_valid("euint512"));
        assert!(!EncryptedType::is_valid("EUINT8"));
        assert!(!EncryptedType::is_valid(""));
    }

    #[test]
    fn recommend_picks_smallest_domain() {
        let above_u64 = U256::from(u64::MAX) + U256::from(1u8);
        let cases = [
            (U256::ZERO, EncryptedType::Ebool),
            (U256::from(1u8), EncryptedType::Ebool),
            (U256::from(2u8), EncryptedType::Euint4),
            (U256::from(16u8), EncryptedType::Euint8),
            (U256::from(256u16), EncryptedType::Euint16),
            (above_u64, EncryptedType::Euint128),
            (U256::MAX, EncryptedType::Euint256),
        ];

        for (value, expected) in cases {
            assert_eq!(EncryptedType::recommend(value), expected, "{value}");
        }
    }

    #[test]
    fn recommend_never_returns_address() {
        let address_max = EncryptedType::Eaddress.max_value();
        let recommended = EncryptedType::recommend(address_max);
        assert_eq!(recommended, EncryptedType::Euint256);
    }

    #[test]
    fn recommend_is_monotonic() {
        let mut samples: Vec<U256> = EncryptedType::ALL
            .iter()
            .flat_map(|ty| {
                let max = ty.max_value();
                [max, max.saturating_add(U256::from(1u8))]
            })
            .chain([U256::ZERO, U256::from(7u8), U256::from(1_000_000u32)])
            .collect();
        samples.sort();

        for pair in samples.windows(2) {
            let a = EncryptedType::recommend(pair[0]).max_value();
            let b = EncryptedType::recommend(pair[1]).max_value();
            assert!(a <= b, "recommendation shrank at {:?}", pair);
        }
    }

    #[test]
    fn recommend_of_type_max_keeps_domain() {
        for ty in EncryptedType::RECOMMENDATION_CHAIN {
            let recommended = EncryptedType::recommend(ty.max_value());
            assert!(recommended.max_value() >= ty.max_value());
        }
    }

    #[test]
    fn validate_value_for_type_bounds() {
        let ty = EncryptedType::Euint8;
        assert!(validate_value_for_type(U256::from(255u16), ty).is_ok());

        let err = validate_value_for_type(U256::from(256u16), ty).unwrap_err();
        match err {
            FhevmError::ValueOutOfRange { ty, .. } => assert_eq!(ty, EncryptedType::Euint8),
            other => panic!("unexpected error: {other}"),
        }

        let two = U256::from(2u8);
        assert!(validate_value_for_type(two, EncryptedType::Ebool).is_err());
    }

    #[test]
    fn encrypted_value_hex_is_prefixed_lowercase() {
        let value = EncryptedValue::new(vec![0xAB, 0x01, 0xFF], EncryptedType::Euint8);
        assert_eq!(value.hex, "0xab01ff");
        assert!(value.input_proof.is_none());
    }
}
