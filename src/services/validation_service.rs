//! Admission pipeline for execution requests

use std::sync::Arc;

use crate::{
    error::ExecutionError,
    handlers::execute::request::ExecutionRequest,
    models::Language,
    security::{CodeSanitizer, RateLimiter, ResourceLimitPolicy},
};

/// Runs every admission check in order and stops at the first failure
pub struct ValidationPipeline {
    rate_limiter: Arc<RateLimiter>,
    resource_policy: ResourceLimitPolicy,
    sanitizer: Arc<CodeSanitizer>,
}

impl ValidationPipeline {
    pub fn new(
        rate_limiter: Arc<RateLimiter>,
        resource_policy: ResourceLimitPolicy,
        sanitizer: Arc<CodeSanitizer>,
    ) -> Self {
        Self {
            rate_limiter,
            resource_policy,
            sanitizer,
        }
    }

    pub fn resource_policy(&self) -> &ResourceLimitPolicy {
        &self.resource_policy
    }

    /// Admit `request` for `client_id`.
    ///
    /// On success `request.code` holds the sanitized source. The rate-limit
    /// counter is charged even when a later check rejects the request.
    pub fn validate(
        &self,
        request: &mut ExecutionRequest,
        client_id: &str,
    ) -> Result<Language, ExecutionError> {
        if !self.rate_limiter.allow(client_id) {
            return Err(ExecutionError::RateLimitExceeded);
        }

        if !self.resource_policy.code_size_ok(&request.code) {
            return Err(ExecutionError::PayloadTooLarge(
                "Code size exceeds limit".to_string(),
            ));
        }

        if !self.resource_policy.input_size_ok(request.input.as_deref()) {
            return Err(ExecutionError::PayloadTooLarge(
                "Input size exceeds limit".to_string(),
            ));
        }

        let language = self.sanitizer.validate_language(&request.language)?;

        self.sanitizer.validate_input(request.input.as_deref())?;

        if !self.sanitizer.is_code_safe(&request.code, language) {
            return Err(ExecutionError::SecurityViolation);
        }

        request.code = self.sanitizer.sanitize_code(&request.code, language)?;

        Ok(language)
    }
}
