//! Remote code execution backend
//!
//! The pipeline talks to the execution service through [`ExecutionBackend`] so
//! that tests can count calls and script failures without a network.

pub mod judge0;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use judge0::Judge0Client;

/// Payload sent to the backend for one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackendSubmission {
    pub source_code: String,
    pub language_id: u32,
    pub stdin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<String>,
}

/// Raw backend response; every field is optional on the wire
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BackendResponse {
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub compile_output: Option<String>,
    /// Seconds, sent either as a number or a numeric string
    pub time: Option<serde_json::Value>,
    /// Kilobytes, number or numeric string
    pub memory: Option<serde_json::Value>,
    pub status: Option<BackendStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BackendStatus {
    pub id: Option<i64>,
    pub description: Option<String>,
}

/// Backend failure modes as seen by the transport
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    #[error("backend rejected the API credential")]
    Unauthorized,

    #[error("backend rate limit exceeded")]
    RateLimited,

    #[error("backend rejected the request: {0}")]
    BadRequest(String),

    #[error("backend returned HTTP {0}: {1}")]
    Status(u16, String),

    #[error("{0}")]
    Transport(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExecutionBackend: Send + Sync {
    /// Run one submission synchronously and return the backend's verdict
    async fn submit(&self, submission: &BackendSubmission) -> Result<BackendResponse, BackendError>;
}
