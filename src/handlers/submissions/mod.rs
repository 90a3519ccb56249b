//! Submission history handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Submission routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_submissions))
        .route("/recent", get(handler::recent_submissions))
        .route("/stats", get(handler::submission_stats))
        .route("/{id}", get(handler::get_submission))
}
