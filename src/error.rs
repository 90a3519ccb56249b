//! Custom error types and handling
//!
//! This module defines the pipeline's failure taxonomy and the HTTP-facing
//! error type with its conversion to responses for the Axum framework.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Reasons an execution request did not produce a normal backend result.
///
/// Every variant is reported to the caller as a structured result rather
/// than an HTTP error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExecutionError {
    // Admission errors
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimitExceeded,

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unsupported language: {language}. Supported languages: {supported}")]
    UnsupportedLanguage { language: String, supported: String },

    // Sanitizer errors
    #[error("Code cannot be empty")]
    EmptyCode,

    #[error("Obfuscated payload detected: {0}")]
    ObfuscationDetected(String),

    #[error("Code too complex: {count} function definitions (max {max})")]
    ComplexityLimitExceeded { count: usize, max: usize },

    #[error("Dangerous operation detected: {0}")]
    DangerousOperation(String),

    #[error("Introspection attack detected: {0}")]
    IntrospectionAttack(String),

    #[error("Prototype pollution detected: {0}")]
    PrototypePollution(String),

    #[error("Inline assembly is not allowed: {0}")]
    InlineAssemblyDisallowed(String),

    #[error("Resource abuse pattern detected: {0}")]
    ResourceAbusePattern(String),

    #[error("Potential infinite loop detected")]
    InfiniteLoopSuspected,

    #[error("Code contains potentially dangerous operations.")]
    SecurityViolation,

    // Backend errors
    #[error("Execution backend rejected the API credentials")]
    BackendAuthError,

    #[error("Execution backend rate limit reached. Please try again later.")]
    BackendRateLimited,

    #[error("Execution backend rejected the request: {0}")]
    BackendRequestInvalid(String),

    #[error("Execution backend error (HTTP {status}): {message}")]
    BackendError { status: u16, message: String },

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

impl ExecutionError {
    /// Stable machine-readable code for this failure
    pub fn code(&self) -> &'static str {
        match self {
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Self::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            Self::UnsupportedLanguage { .. } => "UNSUPPORTED_LANGUAGE",
            Self::EmptyCode => "EMPTY_CODE",
            Self::ObfuscationDetected(_) => "OBFUSCATION_DETECTED",
            Self::ComplexityLimitExceeded { .. } => "COMPLEXITY_LIMIT_EXCEEDED",
            Self::DangerousOperation(_) => "DANGEROUS_OPERATION",
            Self::IntrospectionAttack(_) => "INTROSPECTION_ATTACK",
            Self::PrototypePollution(_) => "PROTOTYPE_POLLUTION",
            Self::InlineAssemblyDisallowed(_) => "INLINE_ASSEMBLY_DISALLOWED",
            Self::ResourceAbusePattern(_) => "RESOURCE_ABUSE_PATTERN",
            Self::InfiniteLoopSuspected => "INFINITE_LOOP_SUSPECTED",
            Self::SecurityViolation => "SECURITY_VIOLATION",
            Self::BackendAuthError => "BACKEND_AUTH_ERROR",
            Self::BackendRateLimited => "BACKEND_RATE_LIMITED",
            Self::BackendRequestInvalid(_) => "BACKEND_REQUEST_INVALID",
            Self::BackendError { .. } => "BACKEND_ERROR",
            Self::ExecutionFailed(_) => "EXECUTION_FAILED",
        }
    }

    /// Raised before the backend is contacted
    pub fn is_validation(&self) -> bool {
        !self.is_backend()
    }

    /// Raised by, or while talking to, the execution backend
    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            Self::BackendAuthError
                | Self::BackendRateLimited
                | Self::BackendRequestInvalid(_)
                | Self::BackendError { .. }
                | Self::ExecutionFailed(_)
        )
    }

    pub(crate) fn unsupported_language(language: &str, supported: String) -> Self {
        Self::UnsupportedLanguage {
            language: language.to_string(),
            supported,
        }
    }
}

/// HTTP-facing error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

/// Error details in response
#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal(_) | Self::Configuration(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log internal errors but don't expose details to clients
        let message = match &self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                "An internal error occurred".to_string()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                "A database error occurred".to_string()
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse {
            error: ErrorDetails {
                code: self.error_code().to_string(),
                message,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            _ => AppError::Database(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_language_message() {
        let err = ExecutionError::unsupported_language("ruby", "java, python".to_string());
        assert!(err.to_string().contains("Unsupported language: ruby"));
        assert_eq!(err.code(), "UNSUPPORTED_LANGUAGE");
    }

    #[test]
    fn test_dangerous_operation_names_token() {
        let err = ExecutionError::DangerousOperation("Runtime.getRuntime()".to_string());
        assert_eq!(
            err.to_string(),
            "Dangerous operation detected: Runtime.getRuntime()"
        );
    }

    #[test]
    fn test_classification() {
        assert!(ExecutionError::RateLimitExceeded.is_validation());
        assert!(ExecutionError::SecurityViolation.is_validation());
        assert!(ExecutionError::BackendRateLimited.is_backend());
        assert!(ExecutionError::ExecutionFailed("timeout".into()).is_backend());
        assert!(!ExecutionError::BackendAuthError.is_validation());
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Database("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
