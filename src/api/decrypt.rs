// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Decryption request validation. Plaintexts are only ever recovered by the
//! permit holder through re-encryption.

use axum::{extract::rejection::JsonRejection, Json};
use serde_json::Value;

use crate::{
    api::fhe::DECRYPT_PATH,
    error::ApiError,
    fhevm::utils::{is_valid_address, is_valid_hex, parse_uint},
    models::{DecryptRequest, DecryptResponse, DecryptValidation, EndpointDoc, UsageExample},
};

const REQUIRED_FIELDS: [(&str, &str); 5] = [
    ("handle", "Encrypted value handle"),
    ("contractAddress", "Contract address"),
    ("userAddress", "User wallet address"),
    ("signature", "EIP-712 permit signature"),
    ("publicKey", "User public key"),
];

/// A required field counts as missing when absent, `null`, `false`, `0` or `""`.
fn is_truthy(field: &Option<Value>) -> bool {
    match field {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64() != Some(0.0),
        Some(Value::String(raw)) => !raw.is_empty(),
        Some(_) => true,
    }
}

fn handle_is_numeric(handle: &Value) -> bool {
    match handle {
        Value::Number(number) => number.is_u64(),
        Value::String(raw) => parse_uint(raw).is_some(),
        _ => false,
    }
}

fn check_address(field: &Option<Value>) -> bool {
    field
        .as_ref()
        .and_then(Value::as_str)
        .is_some_and(is_valid_address)
}

fn check_hex(field: &Option<Value>) -> bool {
    field
        .as_ref()
        .and_then(Value::as_str)
        .is_some_and(is_valid_hex)
}

#[utoipa::path(
    post,
    path = "/v1/fhe/decrypt",
    request_body = DecryptRequest,
    tag = "FHE",
    responses(
        (status = 200, body = DecryptResponse),
        (status = 400, description = "Missing handle, contractAddress or userAddress")
    )
)]
pub async fn validate_decrypt(
    payload: Result<Json<DecryptRequest>, JsonRejection>,
) -> Result<Json<DecryptResponse>, ApiError> {
    let Json(request) = payload?;

    if !is_truthy(&request.handle)
        || !is_truthy(&request.contract_address)
        || !is_truthy(&request.user_address)
    {
        return Err(ApiError::bad_request(
            "Missing required fields: handle, contractAddress, userAddress",
        ));
    }

    let validation = DecryptValidation {
        handle: request.handle.as_ref().is_some_and(handle_is_numeric),
        contract_address: check_address(&request.contract_address),
        user_address: check_address(&request.user_address),
        signature: check_hex(&request.signature),
        public_key: check_hex(&request.public_key),
    };
    tracing::debug!(?validation, "Decryption request validated");

    Ok(Json(DecryptResponse {
        success: true,
        message: "Decryption request validated".to_string(),
        note: "Client-side decryption recommended using FhevmClient re-encryption".to_string(),
        example: UsageExample {
            method: "FhevmClient::decrypt_with_permit".to_string(),
            code: "let permit = client.create_permit(contract, user, &signer).await?;\n\
                   let decrypted = client.decrypt_with_permit(handle, &permit).await?;"
                .to_string(),
        },
        validation,
        required_fields: REQUIRED_FIELDS
            .into_iter()
            .map(|(name, about)| (name.to_string(), about.to_string()))
            .collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/v1/fhe/decrypt",
    tag = "FHE",
    responses((status = 200, body = EndpointDoc))
)]
pub async fn decrypt_docs() -> Json<EndpointDoc> {
    let mut doc = EndpointDoc::post(
        DECRYPT_PATH,
        "Validates decryption requests for FHE operations",
        &[
            ("handle", "uint256 - Encrypted value handle"),
            ("contractAddress", "string - Contract address"),
            ("userAddress", "string - User wallet address"),
            ("signature", "string - EIP-712 permit signature"),
            ("publicKey", "string - User public key"),
        ],
    );
    doc.workflow = Some(vec![
        "1. Create EIP-712 permit signature".to_string(),
        "2. Request re-encryption from gateway".to_string(),
        "3. Decrypt using user private key".to_string(),
    ]);
    Json(doc)
}
