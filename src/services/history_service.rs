//! Submission history: recording attempts and reading them back

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    constants::{statuses, RECENT_SUBMISSIONS_LIMIT},
    db::repositories::SubmissionStore,
    error::{AppError, AppResult},
    handlers::execute::response::ExecutionResult,
    models::{ClientIdentity, NewSubmission, SubmissionFilter, SubmissionRecord, SubmissionStats},
    utils::now_utc,
};

/// Persists one record per orchestrated request
pub struct SubmissionRecorder {
    store: Arc<dyn SubmissionStore>,
}

impl SubmissionRecorder {
    pub fn new(store: Arc<dyn SubmissionStore>) -> Self {
        Self { store }
    }

    /// Store the attempt; `submitted_at` is taken now, not at request start
    pub async fn record(
        &self,
        code: &str,
        language: &str,
        result: &ExecutionResult,
        identity: &ClientIdentity,
    ) -> AppResult<SubmissionRecord> {
        let submission = NewSubmission {
            code: code.to_string(),
            language: language.to_string(),
            output: result.output.clone(),
            error: result.error.clone(),
            status: result.status.clone(),
            execution_time_ms: result.execution_time_ms,
            memory_used_kb: result.memory_used_kb,
            is_correct: result.is_correct,
            submitted_at: now_utc(),
            user_id: identity.user_id.clone(),
            session_id: identity.session_id.clone(),
        };

        self.store.insert(submission).await
    }
}

/// Read-only queries over recorded submissions
pub struct HistoryService {
    store: Arc<dyn SubmissionStore>,
}

impl HistoryService {
    pub fn new(store: Arc<dyn SubmissionStore>) -> Self {
        Self { store }
    }

    /// The caller's submissions: by account when signed in, else by session
    pub async fn list_for(
        &self,
        identity: &ClientIdentity,
        language: Option<String>,
        status: Option<String>,
        page: u32,
        per_page: u32,
    ) -> AppResult<(Vec<SubmissionRecord>, i64)> {
        let filter = SubmissionFilter {
            language,
            status,
            ..owner_filter(identity)
        };
        let offset = (page.saturating_sub(1) as i64) * per_page as i64;
        let limit = per_page as i64;

        let records = self.store.list(&filter, offset, limit).await?;
        let total = self.store.count(&filter).await?;

        Ok((records, total))
    }

    /// Latest submissions from everyone
    pub async fn recent(&self) -> AppResult<Vec<SubmissionRecord>> {
        self.store.recent(RECENT_SUBMISSIONS_LIMIT as i64).await
    }

    /// One submission, visible only to whoever made it
    pub async fn get_for(&self, identity: &ClientIdentity, id: Uuid) -> AppResult<SubmissionRecord> {
        let record = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Submission not found".to_string()))?;

        if !is_owner(identity, &record) {
            return Err(AppError::Forbidden(
                "You can only view your own submissions".to_string(),
            ));
        }

        Ok(record)
    }

    /// Totals for an account; success means status "Accepted"
    pub async fn stats_for_user(&self, user_id: &str) -> AppResult<SubmissionStats> {
        let all = SubmissionFilter {
            user_id: Some(user_id.to_string()),
            ..Default::default()
        };
        let accepted = SubmissionFilter {
            status: Some(statuses::ACCEPTED.to_string()),
            ..all.clone()
        };

        let total = self.store.count(&all).await?;
        let successful = self.store.count(&accepted).await?;

        Ok(SubmissionStats::new(total, successful))
    }
}

fn owner_filter(identity: &ClientIdentity) -> SubmissionFilter {
    match &identity.user_id {
        Some(user_id) => SubmissionFilter {
            user_id: Some(user_id.clone()),
            ..Default::default()
        },
        None => SubmissionFilter {
            session_id: Some(identity.session_id.clone()),
            ..Default::default()
        },
    }
}

fn is_owner(identity: &ClientIdentity, record: &SubmissionRecord) -> bool {
    match (&identity.user_id, &record.user_id) {
        (Some(caller), Some(owner)) if caller == owner => true,
        _ => record.session_id == identity.session_id,
    }
}
