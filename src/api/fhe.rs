// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::rejection::JsonRejection, Json};

use crate::{
    error::ApiError,
    models::{EndpointMap, OperationRequest, RoutedResponse, StatusResponse},
};

pub const ENCRYPT_PATH: &str = "/v1/fhe/encrypt";
pub const DECRYPT_PATH: &str = "/v1/fhe/decrypt";
pub const COMPUTE_PATH: &str = "/v1/fhe/compute";
pub const KEYS_PATH: &str = "/v1/keys";

#[utoipa::path(
    get,
    path = "/v1/fhe",
    tag = "FHE",
    responses((status = 200, body = StatusResponse))
)]
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "operational".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: EndpointMap {
            encrypt: ENCRYPT_PATH.to_string(),
            decrypt: DECRYPT_PATH.to_string(),
            compute: COMPUTE_PATH.to_string(),
            keys: KEYS_PATH.to_string(),
        },
        message: "FHE API is ready".to_string(),
    })
}

/// Point callers at the endpoint serving `operation`.
#[utoipa::path(
    post,
    path = "/v1/fhe",
    request_body = OperationRequest,
    tag = "FHE",
    responses(
        (status = 200, body = RoutedResponse),
        (status = 400, description = "Missing fields or unknown operation")
    )
)]
pub async fn route_operation(
    payload: Result<Json<OperationRequest>, JsonRejection>,
) -> Result<Json<RoutedResponse>, ApiError> {
    let Json(request) = payload?;

    let operation = match (request.operation.as_deref(), &request.data) {
        (Some(operation), Some(_)) if !operation.is_empty() => operation,
        _ => return Err(ApiError::bad_request("Missing required fields: operation, data")),
    };

    let path = match operation {
        "encrypt" => ENCRYPT_PATH,
        "decrypt" => DECRYPT_PATH,
        "compute" => COMPUTE_PATH,
        other => return Err(ApiError::bad_request(format!("Unknown operation: {other}"))),
    };

    Ok(Json(RoutedResponse {
        success: true,
        message: format!("Use {path} endpoint"),
    }))
}
