// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Homomorphic computation request validation. Computation itself runs
//! on-chain in FHEVM contracts.

use axum::{extract::rejection::JsonRejection, Json};
use serde_json::Value;

use crate::{
    api::fhe::COMPUTE_PATH,
    error::ApiError,
    fhevm::{FheOperation, OperationCategory},
    models::{ComputeRequest, ComputeResponse, EndpointDoc, OperationGroup},
};

#[utoipa::path(
    post,
    path = "/v1/fhe/compute",
    request_body = ComputeRequest,
    tag = "FHE",
    responses(
        (status = 200, body = ComputeResponse),
        (status = 400, description = "Missing fields or unsupported operation")
    )
)]
pub async fn validate_compute(
    payload: Result<Json<ComputeRequest>, JsonRejection>,
) -> Result<Json<ComputeResponse>, ApiError> {
    let Json(request) = payload?;

    let (name, operands) = match (request.operation.as_deref(), &request.operands) {
        (Some(name), Some(Value::Array(operands))) if !name.is_empty() => (name, operands),
        _ => {
            return Err(ApiError::bad_request(
                "Missing required fields: operation, operands (array)",
            ))
        }
    };

    let operation = name.parse::<FheOperation>().map_err(|_| {
        ApiError::bad_request(format!(
            "Invalid operation. Must be one of: {}",
            FheOperation::supported_names()
        ))
    })?;

    tracing::debug!(
        operation = %operation,
        operands = operands.len(),
        "Computation request validated"
    );

    Ok(Json(ComputeResponse {
        success: true,
        message: "Computation request validated".to_string(),
        operation,
        category: operation.category(),
        operand_count: operands.len(),
        expected_operands: operation.arity(),
        contract_address: request.contract_address,
        note: "Homomorphic computations are performed on-chain in smart contracts".to_string(),
        supported_operations: FheOperation::ALL.to_vec(),
    }))
}

#[utoipa::path(
    get,
    path = "/v1/fhe/compute",
    tag = "FHE",
    responses((status = 200, body = EndpointDoc))
)]
pub async fn compute_docs() -> Json<EndpointDoc> {
    let mut doc = EndpointDoc::post(
        COMPUTE_PATH,
        "Validates homomorphic computation requests",
        &[
            (
                "operation",
                "string - Type of computation (add, sub, mul, etc.)",
            ),
            ("operands", "array - Encrypted operands"),
            (
                "contractAddress",
                "string - Contract performing computation",
            ),
        ],
    );
    doc.supported_operations = Some(
        OperationCategory::ALL
            .into_iter()
            .map(|category| OperationGroup {
                category,
                operations: category.operations(),
            })
            .collect(),
    );
    doc.note = Some("Actual computations happen on-chain using the TFHE library".to_string());
    Json(doc)
}
