//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor.

use std::sync::Arc;

use crate::{
    backend::ExecutionBackend,
    config::Config,
    db::repositories::SubmissionStore,
    error::{AppError, AppResult},
    security::{CodeSanitizer, RateLimiter, ResourceLimitPolicy, SanitizerRules},
    services::{ExecutionGateway, HistoryService, Orchestrator, SubmissionRecorder, ValidationPipeline},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Validation, dispatch and recording of execution requests
    pub orchestrator: Orchestrator,

    /// Submission history queries
    pub history: HistoryService,

    /// Per-client request counters, shared with the validation pipeline
    pub rate_limiter: Arc<RateLimiter>,

    /// Application configuration
    pub config: Config,
}

impl AppState {
    /// Wire the pipeline from configuration and its two external seams
    pub fn new(
        config: Config,
        rules: &SanitizerRules,
        backend: Arc<dyn ExecutionBackend>,
        store: Arc<dyn SubmissionStore>,
    ) -> AppResult<Self> {
        let sanitizer = CodeSanitizer::new(rules)
            .map_err(|e| AppError::Configuration(format!("invalid sanitizer rule: {}", e)))?;

        let rate_limiter = Arc::new(RateLimiter::new(config.limits.rate_limit_per_minute));
        let resource_policy = ResourceLimitPolicy::new(
            config.limits.max_code_size_bytes,
            config.limits.max_input_size_bytes,
            config.limits.execution,
        );

        let orchestrator = Orchestrator::new(
            ValidationPipeline::new(rate_limiter.clone(), resource_policy, Arc::new(sanitizer)),
            ExecutionGateway::new(backend, config.judge0.language_ids.clone()),
            SubmissionRecorder::new(store.clone()),
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                orchestrator,
                history: HistoryService::new(store),
                rate_limiter,
                config,
            }),
        })
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.inner.orchestrator
    }

    pub fn history(&self) -> &HistoryService {
        &self.inner.history
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.inner.rate_limiter
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
