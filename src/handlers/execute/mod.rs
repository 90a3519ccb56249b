//! Code execution handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Execution routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/execute", post(handler::execute_code))
        .route("/languages", get(handler::list_languages))
        .route("/limits", get(handler::get_limits))
}
