// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Encryption request validation. No ciphertext is produced here; clients
//! encrypt locally with [`FhevmClient::encrypt`](crate::fhevm::FhevmClient::encrypt).

use alloy::primitives::U256;
use axum::{extract::rejection::JsonRejection, Json};
use serde_json::Value;

use crate::{
    api::fhe::ENCRYPT_PATH,
    error::ApiError,
    fhevm::{utils::parse_uint, EncryptedType},
    models::{EncryptRequest, EncryptResponse, EndpointDoc, UsageExample},
};

/// Numeric reading of a JSON plaintext: booleans, non-negative integers,
/// decimal or `0x` hex strings (addresses included).
fn plaintext_from_json(value: &Value) -> Option<U256> {
    match value {
        Value::Bool(flag) => Some(U256::from(*flag as u8)),
        Value::Number(number) => number.as_u64().map(U256::from),
        Value::String(raw) => parse_uint(raw),
        _ => None,
    }
}

fn unsupported_type() -> ApiError {
    ApiError::bad_request(format!(
        "Invalid encryption type. Must be one of: {}",
        EncryptedType::supported_names()
    ))
}

#[utoipa::path(
    post,
    path = "/v1/fhe/encrypt",
    request_body = EncryptRequest,
    tag = "FHE",
    responses(
        (status = 200, body = EncryptResponse),
        (status = 400, description = "Missing value or unsupported type")
    )
)]
pub async fn validate_encrypt(
    payload: Result<Json<EncryptRequest>, JsonRejection>,
) -> Result<Json<EncryptResponse>, ApiError> {
    let Json(request) = payload?;

    let value = request
        .value
        .ok_or_else(|| ApiError::bad_request("Missing required field: value"))?;

    // Only an absent `type` falls back to the default; `null` is rejected.
    let encrypted_type = match &request.encrypted_type {
        None => EncryptedType::DEFAULT,
        Some(requested) => requested
            .as_str()
            .and_then(|name| name.parse::<EncryptedType>().ok())
            .ok_or_else(unsupported_type)?,
    };

    let plaintext = plaintext_from_json(&value);
    tracing::debug!(
        encrypted_type = %encrypted_type,
        numeric = plaintext.is_some(),
        "Encryption request validated"
    );

    Ok(Json(EncryptResponse {
        success: true,
        message: "Encryption request validated".to_string(),
        encrypted_type,
        note: "Client-side encryption recommended using FhevmClient".to_string(),
        example: UsageExample {
            method: "FhevmClient::encrypt".to_string(),
            code: format!(
                "let encrypted = client.encrypt(U256::from({value}), EncryptedType::{encrypted_type:?}).await?;"
            ),
        },
        recommended_type: plaintext.map(EncryptedType::recommend),
        in_range: plaintext.map(|v| encrypted_type.contains(v)),
    }))
}

#[utoipa::path(
    get,
    path = "/v1/fhe/encrypt",
    tag = "FHE",
    responses((status = 200, body = EndpointDoc))
)]
pub async fn encrypt_docs() -> Json<EndpointDoc> {
    let mut doc = EndpointDoc::post(
        ENCRYPT_PATH,
        "Validates encryption requests for FHE operations",
        &[
            ("value", "number | string | boolean - Value to encrypt"),
            ("type", "string - Encryption type (euint64, euint32, etc.)"),
        ],
    );
    doc.supported_types = Some(EncryptedType::ALL.to_vec());
    Json(doc)
}
