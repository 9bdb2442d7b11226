use std::collections::BTreeMap;
use std::sync::Arc;

use crate::catalog::PartyCatalog;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<PartyCatalog>,
    pub config: Config,
}

// API response types

#[derive(Debug, serde::Serialize)]
pub struct RootResponse {
    pub message: String,
    pub status: String,
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
}

// Summary pipeline types

/// Structured summary of one party program
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SummaryResult {
    pub current_vision: String,
    pub future_vision: String,
    pub key_policies: Vec<String>,
}

/// Party name -> summary for one run, ordered by party name
pub type SummaryBatch = BTreeMap<String, SummaryResult>;
