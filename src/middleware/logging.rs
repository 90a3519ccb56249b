//! Logging middleware

use std::time::Instant;

use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};

use crate::models::ClientIdentity;

/// How loudly a finished request should be logged
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    ServerError,
    ClientError,
    Ok,
}

fn classify(status: StatusCode) -> Outcome {
    if status.is_server_error() {
        Outcome::ServerError
    } else if status.is_client_error() && status != StatusCode::NOT_FOUND {
        Outcome::ClientError
    } else {
        Outcome::Ok
    }
}

/// Request logging middleware; runs inside the identity layer so the
/// client id is known
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client = request
        .extensions()
        .get::<ClientIdentity>()
        .map(|identity| identity.client_id().to_string())
        .unwrap_or_default();

    let response = next.run(request).await;

    let status = response.status();
    let duration_ms = format!("{:.2}", start.elapsed().as_secs_f64() * 1000.0);

    match classify(status) {
        Outcome::ServerError => warn!(
            method = %method,
            path = %path,
            client = %client,
            status = status.as_u16(),
            duration_ms = %duration_ms,
            "Request completed with server error"
        ),
        Outcome::ClientError => warn!(
            method = %method,
            path = %path,
            client = %client,
            status = status.as_u16(),
            duration_ms = %duration_ms,
            "Request completed with client error"
        ),
        Outcome::Ok => info!(
            method = %method,
            path = %path,
            client = %client,
            status = status.as_u16(),
            duration_ms = %duration_ms,
            "Request completed"
        ),
    }

    response
}
