// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::ApiError,
    fhevm::utils::is_valid_hex,
    models::{KeyInfoResponse, KeyOperationRequest, KeyOperationResponse},
    state::AppState,
};

const REFRESH_NOTE: &str = "Re-run FhevmClient initialization to refresh keys from the gateway";

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct KeyQuery {
    /// Target chain id (decimal).
    pub chain_id: Option<String>,
    pub contract_address: Option<String>,
}

#[utoipa::path(
    get,
    path = "/v1/keys",
    params(KeyQuery),
    tag = "Keys",
    responses(
        (status = 200, body = KeyInfoResponse),
        (status = 400, description = "Missing or malformed chainId")
    )
)]
pub async fn key_info(
    State(state): State<AppState>,
    Query(params): Query<KeyQuery>,
) -> Result<Json<KeyInfoResponse>, ApiError> {
    let raw = params
        .chain_id
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing required parameter: chainId"))?;
    let chain_id = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| ApiError::bad_request(format!("Invalid chainId: {raw}")))?;

    Ok(Json(KeyInfoResponse {
        success: true,
        chain_id,
        contract_address: params.contract_address,
        gateway: state.fhevm.gateway_address.to_string(),
        note: "Public keys are retrieved from the FHE gateway".to_string(),
        message: "Use FhevmClient::public_key to retrieve public keys from the gateway".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/v1/keys",
    request_body = KeyOperationRequest,
    tag = "Keys",
    responses(
        (status = 200, body = KeyOperationResponse),
        (status = 400, description = "Missing or unknown operation")
    )
)]
pub async fn key_operation(
    payload: Result<Json<KeyOperationRequest>, JsonRejection>,
) -> Result<Json<KeyOperationResponse>, ApiError> {
    let Json(request) = payload?;

    match request.operation.as_deref() {
        None | Some("") => Err(ApiError::bad_request("Missing required field: operation")),
        Some("validate") => Ok(Json(KeyOperationResponse {
            success: true,
            valid: Some(request.public_key.as_deref().is_some_and(is_valid_hex)),
            message: "Public key validation".to_string(),
            note: None,
        })),
        Some("refresh") => {
            tracing::info!(user = ?request.user_address, "Key refresh requested");
            Ok(Json(KeyOperationResponse {
                success: true,
                valid: None,
                message: "Key refresh requested".to_string(),
                note: Some(REFRESH_NOTE.to_string()),
            }))
        }
        Some(other) => Err(ApiError::bad_request(format!("Unknown operation: {other}"))),
    }
}
