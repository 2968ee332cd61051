// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::FhevmConfig;

#[derive(Clone)]
pub struct AppState {
    pub fhevm: Arc<FhevmConfig>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(fhevm: FhevmConfig) -> Self {
        Self {
            fhevm: Arc::new(fhevm),
            started_at: Utc::now(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(FhevmConfig::default())
    }
}
