//! Execution response DTOs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{constants::statuses, error::ExecutionError, models::ExecutionLimits};

/// Outcome of one orchestrated execution request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub output: String,
    /// Set when the run failed partially or entirely
    pub error: Option<String>,
    pub status: String,
    pub execution_time_ms: f64,
    pub memory_used_kb: f64,
    /// Only set when an expected output was supplied
    pub is_correct: Option<bool>,
}

impl ExecutionResult {
    /// Result reported for a rejected or failed run
    pub fn from_error(err: &ExecutionError) -> Self {
        Self {
            output: String::new(),
            error: Some(err.to_string()),
            status: statuses::ERROR.to_string(),
            execution_time_ms: 0.0,
            memory_used_kb: 0.0,
            is_correct: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == statuses::ERROR
    }
}

/// Supported language key to display name
#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    #[serde(flatten)]
    pub languages: BTreeMap<String, String>,
}

/// Quota snapshot for the calling client
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitsResponse {
    pub remaining_requests: u32,
    pub limits: ExecutionLimits,
}
