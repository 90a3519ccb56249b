//! Code execution handler implementations

use axum::{
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue},
    Json,
};

use crate::{models::ClientIdentity, state::AppState};

use super::{
    request::ExecutionRequest,
    response::{ExecutionResult, LanguagesResponse, LimitsResponse},
};

const RATE_LIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const RATE_LIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

/// Run submitted code.
///
/// Rejections and backend failures are reported in the body with status
/// "Error"; the HTTP status is always 200.
pub async fn execute_code(
    State(state): State<AppState>,
    identity: ClientIdentity,
    Json(payload): Json<ExecutionRequest>,
) -> (HeaderMap, Json<ExecutionResult>) {
    let result = state.orchestrator().execute(payload, &identity).await;

    let limiter = state.rate_limiter();
    let mut headers = HeaderMap::new();
    headers.insert(RATE_LIMIT_LIMIT, HeaderValue::from(limiter.ceiling()));
    headers.insert(
        RATE_LIMIT_REMAINING,
        HeaderValue::from(limiter.remaining_quota(&identity.quota_key())),
    );

    (headers, Json(result))
}

/// Languages the service will run, keyed by request name
pub async fn list_languages(State(state): State<AppState>) -> Json<LanguagesResponse> {
    let languages = state
        .orchestrator()
        .gateway()
        .supported_languages()
        .into_iter()
        .map(|language| (language.as_str().to_string(), language.display_name().to_string()))
        .collect();

    Json(LanguagesResponse { languages })
}

/// Remaining quota and execution caps for the caller
pub async fn get_limits(
    State(state): State<AppState>,
    identity: ClientIdentity,
) -> Json<LimitsResponse> {
    let quota_key = identity.quota_key();

    Json(LimitsResponse {
        remaining_requests: state.rate_limiter().remaining_quota(&quota_key),
        limits: state
            .orchestrator()
            .validation()
            .resource_policy()
            .limits_for(&quota_key),
    })
}
