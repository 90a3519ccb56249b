//! Dispatch of admitted requests to the execution backend

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::instrument;

use crate::{
    backend::{BackendError, BackendResponse, BackendSubmission, ExecutionBackend},
    constants::statuses,
    error::ExecutionError,
    handlers::execute::{request::ExecutionRequest, response::ExecutionResult},
    models::{ClientIdentity, ExecutionLimits, Language},
};

/// Formats requests for the backend and normalizes its answers.
///
/// Requests are assumed to have passed the validation pipeline already; the
/// only check repeated here is whether the backend knows the language.
pub struct ExecutionGateway {
    backend: Arc<dyn ExecutionBackend>,
    language_ids: HashMap<Language, u32>,
}

impl ExecutionGateway {
    pub fn new(backend: Arc<dyn ExecutionBackend>, language_ids: HashMap<Language, u32>) -> Self {
        Self {
            backend,
            language_ids,
        }
    }

    /// Languages the backend has an id for, in declaration order
    pub fn supported_languages(&self) -> Vec<Language> {
        Language::ALL
            .into_iter()
            .filter(|l| self.language_ids.contains_key(l))
            .collect()
    }

    /// Run `request` once on the backend. There is no retry.
    #[instrument(
        skip_all,
        fields(
            client = %identity.client_id(),
            language = %request.language,
            timeout_ms = limits.timeout_ms,
            max_memory_mb = limits.max_memory_mb,
            max_output_bytes = limits.max_output_bytes,
        )
    )]
    pub async fn execute(
        &self,
        request: &ExecutionRequest,
        identity: &ClientIdentity,
        limits: ExecutionLimits,
    ) -> Result<ExecutionResult, ExecutionError> {
        let language_id = self.resolve_language_id(&request.language)?;

        let submission = BackendSubmission {
            source_code: request.code.clone(),
            language_id,
            stdin: request.input.clone().unwrap_or_default(),
            expected_output: request.expected_output.clone(),
        };

        let response = self
            .backend
            .submit(&submission)
            .await
            .map_err(classify_backend_error)?;

        Ok(normalize(response, request.expected_output.as_deref()))
    }

    fn resolve_language_id(&self, language: &str) -> Result<u32, ExecutionError> {
        language
            .parse::<Language>()
            .ok()
            .and_then(|l| self.language_ids.get(&l).copied())
            .ok_or_else(|| {
                let supported = self
                    .supported_languages()
                    .iter()
                    .map(|l| l.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                ExecutionError::unsupported_language(language, supported)
            })
    }
}

fn classify_backend_error(err: BackendError) -> ExecutionError {
    match err {
        BackendError::Unauthorized => ExecutionError::BackendAuthError,
        BackendError::RateLimited => ExecutionError::BackendRateLimited,
        BackendError::BadRequest(body) => ExecutionError::BackendRequestInvalid(body),
        BackendError::Status(status, message) => ExecutionError::BackendError { status, message },
        BackendError::Transport(message) => ExecutionError::ExecutionFailed(message),
    }
}

/// Map a raw backend response onto an [`ExecutionResult`]
pub fn normalize(response: BackendResponse, expected_output: Option<&str>) -> ExecutionResult {
    let output = response
        .stdout
        .or(response.compile_output)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_default();

    let error = response.stderr.filter(|s| !s.is_empty());

    let status = response
        .status
        .and_then(|s| s.description)
        .unwrap_or_else(|| statuses::COMPLETED.to_string());

    let is_correct = expected_output
        .filter(|expected| !expected.is_empty())
        .map(|expected| output.trim() == expected.trim());

    ExecutionResult {
        output,
        error,
        status,
        // Backend reports seconds
        execution_time_ms: parse_metric(response.time.as_ref()) * 1000.0,
        memory_used_kb: parse_metric(response.memory.as_ref()),
        is_correct,
    }
}

/// Numbers and numeric strings parse; anything else is `0.0`
fn parse_metric(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}
