// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the validation gateway. All types derive
//! `ToSchema` for the OpenAPI document served at `/docs`.
//!
//! Request fields are optional at the serde level so that handlers can
//! answer a missing field with the gateway's own 400 message rather than a
//! generic deserialization error.
//!
//! ## Model Categories
//!
//! - **Status**: API status and operation routing
//! - **Encrypt / Decrypt / Compute**: request validation echoes
//! - **Keys**: public key information
//! - **Docs**: static endpoint documentation

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::fhevm::{EncryptedType, FheOperation, OperationCategory};

// =============================================================================
// Status
// =============================================================================

/// Paths of the FHE endpoints.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct EndpointMap {
    pub encrypt: String,
    pub decrypt: String,
    pub compute: String,
    pub keys: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusResponse {
    /// Always `operational` while the process serves requests.
    pub status: String,
    pub version: String,
    pub endpoints: EndpointMap,
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct OperationRequest {
    /// One of `encrypt`, `decrypt`, `compute`.
    pub operation: Option<String>,
    /// Operation payload; must be present and non-null.
    #[schema(value_type = Object)]
    pub data: Option<Value>,
}

/// Generic `{success, message}` acknowledgement.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoutedResponse {
    pub success: bool,
    pub message: String,
}

// =============================================================================
// Encrypt
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct EncryptRequest {
    /// Plaintext: number, decimal or hex string, boolean, or address.
    #[schema(value_type = Object)]
    pub value: Option<Value>,
    /// Encrypted type wire name. Defaults to `euint64` when absent; an
    /// explicit `null` is kept as `Some(Value::Null)` and rejected.
    #[serde(rename = "type", default, deserialize_with = "explicit_value")]
    #[schema(value_type = String)]
    pub encrypted_type: Option<Value>,
}

/// Wraps whatever is present, `null` included. Paired with
/// `#[serde(default)]` so that only an absent field yields `None`.
fn explicit_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Client-side usage hint attached to validation responses.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct UsageExample {
    /// SDK entry point to call.
    pub method: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EncryptResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "type")]
    pub encrypted_type: EncryptedType,
    pub note: String,
    pub example: UsageExample,
    /// Smallest integer type holding the value, when the value is numeric.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_type: Option<EncryptedType>,
    /// Whether the value fits the requested type, when the value is numeric.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_range: Option<bool>,
}

// =============================================================================
// Decrypt
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecryptRequest {
    /// Ciphertext handle, as a number or a decimal/hex string.
    #[schema(value_type = Object)]
    pub handle: Option<Value>,
    #[schema(value_type = String)]
    pub contract_address: Option<Value>,
    #[schema(value_type = String)]
    pub user_address: Option<Value>,
    /// EIP-712 permit signature.
    #[schema(value_type = String)]
    pub signature: Option<Value>,
    /// Public key the permit was signed over.
    #[schema(value_type = String)]
    pub public_key: Option<Value>,
}

/// Shape checks performed on a decryption request. Informational only.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DecryptValidation {
    pub handle: bool,
    pub contract_address: bool,
    pub user_address: bool,
    pub signature: bool,
    pub public_key: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecryptResponse {
    pub success: bool,
    pub message: String,
    pub note: String,
    pub example: UsageExample,
    pub validation: DecryptValidation,
    /// Description of every field a complete request carries.
    pub required_fields: BTreeMap<String, String>,
}

// =============================================================================
// Compute
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComputeRequest {
    pub operation: Option<String>,
    /// Encrypted operands; must be a JSON array.
    #[schema(value_type = Object)]
    pub operands: Option<Value>,
    pub contract_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComputeResponse {
    pub success: bool,
    pub message: String,
    pub operation: FheOperation,
    pub category: OperationCategory,
    pub operand_count: usize,
    /// Operand count the operation takes on-chain.
    pub expected_operands: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    pub note: String,
    pub supported_operations: Vec<FheOperation>,
}

// =============================================================================
// Keys
// =============================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KeyInfoResponse {
    pub success: bool,
    pub chain_id: u64,
    pub contract_address: Option<String>,
    /// Gateway the SDK fetches public keys from.
    pub gateway: String,
    pub note: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KeyOperationRequest {
    /// `validate` or `refresh`.
    pub operation: Option<String>,
    pub public_key: Option<String>,
    pub user_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct KeyOperationResponse {
    pub success: bool,
    /// Present for `validate`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// =============================================================================
// Endpoint Documentation
// =============================================================================

/// Operations of one category, for the compute documentation.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct OperationGroup {
    pub category: OperationCategory,
    pub operations: Vec<FheOperation>,
}

/// Static description of a POST endpoint, served on its GET route.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDoc {
    pub endpoint: String,
    pub method: String,
    pub description: String,
    pub parameters: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_types: Option<Vec<EncryptedType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_operations: Option<Vec<OperationGroup>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl EndpointDoc {
    pub fn post(endpoint: &str, description: &str, parameters: &[(&str, &str)]) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            method: "POST".to_string(),
            description: description.to_string(),
            parameters: parameters
                .iter()
                .map(|(name, doc)| (name.to_string(), doc.to_string()))
                .collect(),
            supported_types: None,
            supported_operations: None,
            workflow: None,
            note: None,
        }
    }
}
