// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! FHEVM SDK - Client SDK and validation gateway for FHEVM networks
//!
//! This crate lets applications encrypt values for FHEVM smart contracts,
//! issue EIP-712 re-encryption permits and read back plaintexts through the
//! network's re-encryption service. The FHE engine itself is an external
//! component plugged in through [`fhevm::EngineFactory`].
//!
//! ## Modules
//!
//! - `fhevm` - Client SDK (types, engine port, instances, encryption, permits)
//! - `api` - Validation-only HTTP endpoints (Axum)
//! - `config` - Environment configuration
//! - `models` - HTTP request/response bodies

pub mod api;
pub mod config;
pub mod error;
pub mod fhevm;
pub mod models;
pub mod state;
