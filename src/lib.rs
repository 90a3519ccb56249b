//! Codeguard - Secure Code Execution Gateway
//!
//! This library accepts untrusted source code, screens it, forwards it to a
//! remote execution backend and keeps a history of every attempt.
//!
//! # Features
//!
//! - Per-client fixed-window rate limiting
//! - Size ceilings on code and standard input
//! - Per-language pattern screening (advisory, not a sandbox)
//! - Judge0-compatible execution backend with classified failures
//! - Submission history in Postgres or in memory
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Validation pipeline, execution gateway, recorder, orchestrator
//! - **Security**: Rate limiter, resource policy, sanitizer and its rules
//! - **Backend**: Remote execution client
//! - **Repositories**: Submission storage
//! - **Models**: Domain models

pub mod backend;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod security;
pub mod services;
pub mod state;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
