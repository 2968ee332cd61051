// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and the
//! typed configuration structs built from them at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `FHEVM_GATEWAY_ADDRESS` | Gateway contract verifying the network public key | `0x79d6742b1Bf62452bfcBC6b137ed4eA1ba459a6B` |
//! | `FHEVM_CHAIN_ID` | Chain the SDK encrypts for | `11155111` (Sepolia) |
//! | `FHEVM_RPC_URL` | Gateway/RPC endpoint handed to the engine | Optional |
//! | `FHEVM_ACL_ADDRESS` | ACL contract address | Optional |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `TLS_CERT_PATH` | PEM certificate chain; enables HTTPS with `TLS_KEY_PATH` | Optional |
//! | `TLS_KEY_PATH` | PEM private key | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::path::PathBuf;
use std::str::FromStr;

use alloy::primitives::Address;
use url::Url;

use crate::fhevm::engine::EngineParams;
use crate::fhevm::utils::parse_address;

pub const GATEWAY_ADDRESS_ENV: &str = "FHEVM_GATEWAY_ADDRESS";
pub const CHAIN_ID_ENV: &str = "FHEVM_CHAIN_ID";
pub const RPC_URL_ENV: &str = "FHEVM_RPC_URL";
pub const ACL_ADDRESS_ENV: &str = "FHEVM_ACL_ADDRESS";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Public Sepolia gateway used by the reference deployment.
pub const DEFAULT_GATEWAY_ADDRESS: &str = "0x79d6742b1Bf62452bfcBC6b137ed4eA1ba459a6B";

/// Sepolia.
pub const DEFAULT_CHAIN_ID: u64 = 11_155_111;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: invalid address `{value}`")]
    InvalidAddress { var: &'static str, value: String },

    #[error("{var}: invalid chain id `{value}`")]
    InvalidChainId { var: &'static str, value: String },

    #[error("{var}: invalid URL: {reason}")]
    InvalidUrl { var: &'static str, reason: String },

    #[error("{var}: invalid port `{value}`")]
    InvalidPort { var: &'static str, value: String },

    #[error("TLS_CERT_PATH and TLS_KEY_PATH must be set together")]
    IncompleteTls,
}

// =============================================================================
// FHEVM Configuration
// =============================================================================

/// Connection settings for one chain/gateway pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FhevmConfig {
    /// Gateway contract address for decryption.
    pub gateway_address: Address,
    /// Network chain ID.
    pub chain_id: u64,
    /// RPC/gateway URL for the network.
    pub rpc_url: Option<Url>,
    /// ACL contract address.
    pub acl_address: Option<Address>,
}

impl FhevmConfig {
    pub fn new(gateway_address: Address, chain_id: u64) -> Self {
        Self {
            gateway_address,
            chain_id,
            rpc_url: None,
            acl_address: None,
        }
    }

    pub fn with_rpc_url(mut self, rpc_url: Url) -> Self {
        self.rpc_url = Some(rpc_url);
        self
    }

    pub fn with_acl_address(mut self, acl_address: Address) -> Self {
        self.acl_address = Some(acl_address);
        self
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let gateway =
            lookup(GATEWAY_ADDRESS_ENV).unwrap_or_else(|| DEFAULT_GATEWAY_ADDRESS.to_string());
        let gateway_address = parse_address(gateway.trim()).ok_or(ConfigError::InvalidAddress {
            var: GATEWAY_ADDRESS_ENV,
            value: gateway.clone(),
        })?;

        let chain_id = match lookup(CHAIN_ID_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|id| *id > 0)
                .ok_or(ConfigError::InvalidChainId {
                    var: CHAIN_ID_ENV,
                    value: raw,
                })?,
            None => DEFAULT_CHAIN_ID,
        };

        let rpc_url = lookup(RPC_URL_ENV)
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| {
                Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
                    var: RPC_URL_ENV,
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        let acl_address = lookup(ACL_ADDRESS_ENV)
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| {
                parse_address(raw.trim()).ok_or(ConfigError::InvalidAddress {
                    var: ACL_ADDRESS_ENV,
                    value: raw.clone(),
                })
            })
            .transpose()?;

        Ok(Self {
            gateway_address,
            chain_id,
            rpc_url,
            acl_address,
        })
    }

    /// Parameters handed to the engine when bootstrapping an instance.
    pub fn engine_params(&self) -> EngineParams {
        EngineParams {
            chain_id: self.chain_id,
            public_key_verifier: self.gateway_address,
            gateway_url: self.rpc_url.clone(),
        }
    }
}

impl Default for FhevmConfig {
    fn default() -> Self {
        Self::new(
            Address::from_str(DEFAULT_GATEWAY_ADDRESS).unwrap_or(Address::ZERO),
            DEFAULT_CHAIN_ID,
        )
    }
}

// =============================================================================
// Server Configuration
// =============================================================================

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Certificate and key files for HTTPS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup(PORT_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort {
                    var: PORT_ENV,
                    value: raw,
                })?,
            None => DEFAULT_PORT,
        };

        let tls = match (lookup(TLS_CERT_PATH_ENV), lookup(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: PathBuf::from(cert),
                key: PathBuf::from(key),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteTls),
        };

        Ok(Self {
            host,
            port,
            tls,
            log_format: LogFormat::parse(lookup(LOG_FORMAT_ENV).as_deref()),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
