//! Submission response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::SubmissionRecord;

/// Submission list response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionsListResponse {
    pub submissions: Vec<SubmissionRecord>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

/// Public feed entry; the source code is not included
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentSubmissionResponse {
    pub id: Uuid,
    pub language: String,
    pub status: String,
    pub execution_time_ms: f64,
    pub memory_used_kb: f64,
    pub submitted_at: DateTime<Utc>,
}

impl From<SubmissionRecord> for RecentSubmissionResponse {
    fn from(record: SubmissionRecord) -> Self {
        Self {
            id: record.id,
            language: record.language,
            status: record.status,
            execution_time_ms: record.execution_time_ms,
            memory_used_kb: record.memory_used_kb,
            submitted_at: record.submitted_at,
        }
    }
}
