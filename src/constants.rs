//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Upper bound on any request body accepted by the router (1 MB)
pub const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

// =============================================================================
// RATE LIMITING
// =============================================================================

/// Maximum execute requests per client per window
pub const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 100;

/// Width of one rate-limit bucket in milliseconds
pub const RATE_LIMIT_WINDOW_MS: u64 = 60_000;

// =============================================================================
// RESOURCE LIMITS
// =============================================================================

/// Maximum source code size in bytes (100 KB)
pub const DEFAULT_MAX_CODE_SIZE_BYTES: usize = 100 * 1024;

/// Maximum stdin size in bytes (10 KB)
pub const DEFAULT_MAX_INPUT_SIZE_BYTES: usize = 10 * 1024;

/// Execution timeout forwarded to the backend
pub const DEFAULT_EXECUTION_TIMEOUT_MS: u64 = 10_000;

/// Memory ceiling forwarded to the backend
pub const DEFAULT_EXECUTION_MAX_MEMORY_MB: u64 = 100;

/// Output ceiling forwarded to the backend
pub const DEFAULT_EXECUTION_MAX_OUTPUT_BYTES: u64 = 10 * 1024;

// =============================================================================
// SANITIZER DEFAULTS
// =============================================================================

/// Maximum source length in characters accepted by the sanitizer
pub const DEFAULT_SANITIZER_MAX_CODE_LENGTH: usize = 10_000;

/// Maximum stdin length in characters accepted by the sanitizer
pub const DEFAULT_SANITIZER_MAX_INPUT_LENGTH: usize = 1_000;

/// Shortest contiguous base64-alphabet run treated as an encoded payload
pub const DEFAULT_MIN_BASE64_RUN: usize = 100;

/// Shortest run of consecutive `\xNN` / `\uNNNN` escapes treated as an encoded payload
pub const DEFAULT_MIN_HEX_ESCAPE_RUN: usize = 8;

/// Maximum number of function definition markers in one submission
pub const DEFAULT_MAX_FUNCTION_DEFINITIONS: usize = 50;

// =============================================================================
// EXECUTION BACKEND
// =============================================================================

/// Judge0 CE endpoint on RapidAPI
pub const DEFAULT_JUDGE0_BASE_URL: &str = "https://judge0-ce.p.rapidapi.com";

/// Outbound request timeout for the execution backend
pub const DEFAULT_JUDGE0_TIMEOUT_SECS: u64 = 30;

/// Judge0 language identifiers for the supported language set
pub mod judge0_language_ids {
    pub const JAVA: u32 = 62;
    pub const PYTHON: u32 = 71;
    pub const CPP: u32 = 54;
    pub const C: u32 = 50;
    pub const JAVASCRIPT: u32 = 63;
    pub const GO: u32 = 60;
}

// =============================================================================
// RESULT STATUS LABELS
// =============================================================================

/// Status labels synthesized locally (backend labels pass through verbatim)
pub mod statuses {
    pub const ERROR: &str = "Error";
    pub const COMPLETED: &str = "Completed";
    pub const ACCEPTED: &str = "Accepted";
}

// =============================================================================
// CLIENT IDENTITY
// =============================================================================

/// Header carrying the per-browser session identifier
pub const SESSION_HEADER: &str = "x-session-id";

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for paginated results
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Maximum page size for paginated results
pub const MAX_PAGE_SIZE: u32 = 100;

/// Number of entries returned by the recent-submissions feed
pub const RECENT_SUBMISSIONS_LIMIT: usize = 10;
