//! HTTP middleware

pub mod auth;
pub mod logging;

pub use auth::{identity_middleware, AuthenticatedUser};
pub use logging::logging_middleware;
