//! Submission history model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One persisted execution attempt (append-only)
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub id: Uuid,
    pub code: String,
    pub language: String,
    pub output: String,
    pub error: Option<String>,
    pub status: String,
    pub execution_time_ms: f64,
    pub memory_used_kb: f64,
    pub is_correct: Option<bool>,
    pub submitted_at: DateTime<Utc>,
    pub user_id: Option<String>,
    pub session_id: String,
}

/// Insert payload for a submission record
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub code: String,
    pub language: String,
    pub output: String,
    pub error: Option<String>,
    pub status: String,
    pub execution_time_ms: f64,
    pub memory_used_kb: f64,
    pub is_correct: Option<bool>,
    pub submitted_at: DateTime<Utc>,
    pub user_id: Option<String>,
    pub session_id: String,
}

impl NewSubmission {
    /// Materialize the record with a fresh id
    pub fn into_record(self) -> SubmissionRecord {
        SubmissionRecord {
            id: Uuid::new_v4(),
            code: self.code,
            language: self.language,
            output: self.output,
            error: self.error,
            status: self.status,
            execution_time_ms: self.execution_time_ms,
            memory_used_kb: self.memory_used_kb,
            is_correct: self.is_correct,
            submitted_at: self.submitted_at,
            user_id: self.user_id,
            session_id: self.session_id,
        }
    }
}

/// Owner and attribute filter for history queries.
///
/// `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct SubmissionFilter {
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub language: Option<String>,
    pub status: Option<String>,
}

impl SubmissionFilter {
    pub fn matches(&self, record: &SubmissionRecord) -> bool {
        self.user_id
            .as_ref()
            .is_none_or(|u| record.user_id.as_ref() == Some(u))
            && self
                .session_id
                .as_ref()
                .is_none_or(|s| &record.session_id == s)
            && self
                .language
                .as_ref()
                .is_none_or(|l| &record.language == l)
            && self.status.as_ref().is_none_or(|s| &record.status == s)
    }
}

/// Per-account submission statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionStats {
    pub total_submissions: i64,
    pub successful_submissions: i64,
    /// Percentage in `0.0..=100.0`
    pub success_rate: f64,
}

impl SubmissionStats {
    pub fn new(total_submissions: i64, successful_submissions: i64) -> Self {
        let success_rate = if total_submissions > 0 {
            successful_submissions as f64 / total_submissions as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total_submissions,
            successful_submissions,
            success_rate,
        }
    }
}
