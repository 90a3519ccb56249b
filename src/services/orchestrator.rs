//! Single entry point for code execution requests
//!
//! ```text
//! Received -> Validating -> Rejected    -> Recorded -> Done
//!                        -> Dispatching -> Recorded -> Done
//! ```
//!
//! Every path records exactly one submission and yields an [`ExecutionResult`].

use std::fmt;

use crate::{
    error::ExecutionError,
    handlers::execute::{request::ExecutionRequest, response::ExecutionResult},
    models::{ClientIdentity, ExecutionLimits},
    services::{ExecutionGateway, SubmissionRecorder, ValidationPipeline},
    utils::code_fingerprint,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Validating,
    Rejected,
    Dispatching,
    Recorded,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::Validating => "validating",
            Stage::Rejected => "rejected",
            Stage::Dispatching => "dispatching",
            Stage::Recorded => "recorded",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

pub struct Orchestrator {
    validation: ValidationPipeline,
    gateway: ExecutionGateway,
    recorder: SubmissionRecorder,
}

impl Orchestrator {
    pub fn new(
        validation: ValidationPipeline,
        gateway: ExecutionGateway,
        recorder: SubmissionRecorder,
    ) -> Self {
        Self {
            validation,
            gateway,
            recorder,
        }
    }

    pub fn validation(&self) -> &ValidationPipeline {
        &self.validation
    }

    pub fn gateway(&self) -> &ExecutionGateway {
        &self.gateway
    }

    /// Validate, dispatch once, record, and report
    pub async fn execute(
        &self,
        mut request: ExecutionRequest,
        identity: &ClientIdentity,
    ) -> ExecutionResult {
        let client_id = identity.client_id();
        let fingerprint = code_fingerprint(&request.code);
        transition(Stage::Received, client_id);

        transition(Stage::Validating, client_id);
        let result = match self.validation.validate(&mut request, &identity.quota_key()) {
            Err(err) => {
                transition(Stage::Rejected, client_id);
                tracing::warn!(
                    client = client_id,
                    language = %request.language,
                    code = err.code(),
                    fingerprint = %fingerprint,
                    "Execution request rejected: {}",
                    err
                );
                ExecutionResult::from_error(&err)
            }
            Ok(language) => {
                tracing::info!(
                    client = client_id,
                    language = %language,
                    fingerprint = %fingerprint,
                    "Execution request admitted"
                );
                transition(Stage::Dispatching, client_id);

                let limits = self.validation.resource_policy().limits_for(client_id);
                self.dispatch(&request, identity, limits).await
            }
        };

        // Records the sanitized code when admitted, the original otherwise
        match self
            .recorder
            .record(&request.code, &request.language, &result, identity)
            .await
        {
            Ok(record) => {
                tracing::debug!(submission_id = %record.id, "Submission recorded");
            }
            Err(e) => {
                tracing::error!(client = client_id, error = %e, "Failed to record submission");
            }
        }
        transition(Stage::Recorded, client_id);

        tracing::info!(
            client = client_id,
            language = %request.language,
            status = %result.status,
            success = !result.is_error(),
            "Execution request completed"
        );
        transition(Stage::Done, client_id);

        result
    }

    async fn dispatch(
        &self,
        request: &ExecutionRequest,
        identity: &ClientIdentity,
        limits: ExecutionLimits,
    ) -> ExecutionResult {
        match self.gateway.execute(request, identity, limits).await {
            Ok(result) => result,
            Err(err) => {
                log_backend_failure(&err, identity.client_id());
                ExecutionResult::from_error(&err)
            }
        }
    }
}

fn log_backend_failure(err: &ExecutionError, client_id: &str) {
    if err.is_backend() {
        tracing::warn!(client = client_id, code = err.code(), "Execution backend call failed: {}", err);
    } else {
        tracing::warn!(client = client_id, code = err.code(), "Execution request refused by gateway: {}", err);
    }
}

fn transition(stage: Stage, client_id: &str) {
    tracing::debug!(client = client_id, stage = %stage, "Execution stage");
}
