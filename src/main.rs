// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, time::Duration};

use axum_server::{tls_rustls::RustlsConfig, Handle};
use fhevm_sdk::{
    api::router,
    config::{FhevmConfig, LogFormat, ServerConfig, DEFAULT_LOG_FILTER},
    state::AppState,
};
use tracing_subscriber::EnvFilter;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.init(),
    }
}

/// Resolves on Ctrl-C. Returns `false` when the signal cannot be listened for.
async fn shutdown_signal() -> bool {
    match tokio::signal::ctrl_c().await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            false
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let server = ServerConfig::from_env()?;
    init_tracing(server.log_format);

    let fhevm = FhevmConfig::from_env()?;
    tracing::info!(
        chain_id = fhevm.chain_id,
        gateway = %fhevm.gateway_address,
        rpc_url = fhevm.rpc_url.as_ref().map(|u| u.as_str()),
        "Loaded FHEVM configuration"
    );

    let app = router(AppState::new(fhevm));
    let addr: SocketAddr = server.bind_address().parse()?;

    let handle = Handle::new();
    let shutdown = handle.clone();
    tokio::spawn(async move {
        if shutdown_signal().await {
            tracing::info!("Shutdown signal received, draining connections");
            shutdown.graceful_shutdown(Some(SHUTDOWN_GRACE));
        }
    });

    match &server.tls {
        Some(tls) => {
            // Ring provider must be installed before any rustls config is built.
            rustls::crypto::ring::default_provider()
                .install_default()
                .map_err(|_| "Failed to install rustls crypto provider")?;
            let tls_config = RustlsConfig::from_pem_file(&tls.cert, &tls.key).await?;

            tracing::info!(%addr, "FHEVM gateway listening on https (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            tracing::info!(%addr, "FHEVM gateway listening on http (docs at /docs)");
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
    }

    tracing::info!("Server stopped");
    Ok(())
}
