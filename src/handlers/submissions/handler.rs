//! Submission handler implementations

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    models::{ClientIdentity, SubmissionRecord, SubmissionStats},
    state::AppState,
};

use super::{
    request::ListSubmissionsQuery,
    response::{RecentSubmissionResponse, SubmissionsListResponse},
};

/// The caller's own submissions, newest first
pub async fn list_submissions(
    State(state): State<AppState>,
    identity: ClientIdentity,
    Query(query): Query<ListSubmissionsQuery>,
) -> AppResult<Json<SubmissionsListResponse>> {
    query.validate()?;

    let page = query.page();
    let per_page = query.per_page();
    let (submissions, total) = state
        .history()
        .list_for(&identity, query.language, query.status, page, per_page)
        .await?;

    Ok(Json(SubmissionsListResponse {
        submissions,
        total,
        page,
        per_page,
    }))
}

/// Latest submissions from all callers
pub async fn recent_submissions(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<RecentSubmissionResponse>>> {
    let recent = state.history().recent().await?;
    Ok(Json(recent.into_iter().map(Into::into).collect()))
}

/// Get submission by ID
pub async fn get_submission(
    State(state): State<AppState>,
    identity: ClientIdentity,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SubmissionRecord>> {
    let record = state.history().get_for(&identity, id).await?;
    Ok(Json(record))
}

/// Totals for the signed-in account
pub async fn submission_stats(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<SubmissionStats>> {
    let stats = state.history().stats_for_user(user.user_id()).await?;
    Ok(Json(stats))
}
