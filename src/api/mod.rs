// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    fhevm::{EncryptedType, FheOperation, OperationCategory},
    models::{
        ComputeRequest, ComputeResponse, DecryptRequest, DecryptResponse, DecryptValidation,
        EncryptRequest, EncryptResponse, EndpointDoc, EndpointMap, KeyInfoResponse,
        KeyOperationRequest, KeyOperationResponse, OperationGroup, OperationRequest,
        RoutedResponse, StatusResponse, UsageExample,
    },
    state::AppState,
};

pub mod compute;
pub mod decrypt;
pub mod encrypt;
pub mod fhe;
pub mod health;
pub mod keys;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/fhe", get(fhe::status).post(fhe::route_operation))
        .route(
            "/fhe/encrypt",
            get(encrypt::encrypt_docs).post(encrypt::validate_encrypt),
        )
        .route(
            "/fhe/decrypt",
            get(decrypt::decrypt_docs).post(decrypt::validate_decrypt),
        )
        .route(
            "/fhe/compute",
            get(compute::compute_docs).post(compute::validate_compute),
        )
        .route("/keys", get(keys::key_info).post(keys::key_operation))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .nest("/v1", v1_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        fhe::status,
        fhe::route_operation,
        encrypt::validate_encrypt,
        encrypt::encrypt_docs,
        decrypt::validate_decrypt,
        decrypt::decrypt_docs,
        compute::validate_compute,
        compute::compute_docs,
        keys::key_info,
        keys::key_operation,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            EncryptedType,
            FheOperation,
            OperationCategory,
            StatusResponse,
            EndpointMap,
            OperationRequest,
            RoutedResponse,
            EncryptRequest,
            EncryptResponse,
            UsageExample,
            DecryptRequest,
            DecryptResponse,
            DecryptValidation,
            ComputeRequest,
            ComputeResponse,
            KeyInfoResponse,
            KeyOperationRequest,
            KeyOperationResponse,
            OperationGroup,
            EndpointDoc,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "FHE", description = "Validation of encryption, decryption and computation requests"),
        (name = "Keys", description = "Public key information"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
