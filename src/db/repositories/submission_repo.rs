//! Submission history repository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{NewSubmission, SubmissionFilter, SubmissionRecord},
};

/// Append-only storage for submission records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Persist a new record and return it with its id
    async fn insert(&self, submission: NewSubmission) -> AppResult<SubmissionRecord>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SubmissionRecord>>;

    /// Matching records, newest first
    async fn list(
        &self,
        filter: &SubmissionFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<SubmissionRecord>>;

    /// Newest records across every owner
    async fn recent(&self, limit: i64) -> AppResult<Vec<SubmissionRecord>>;

    async fn count(&self, filter: &SubmissionFilter) -> AppResult<i64>;
}

/// Postgres-backed store on the `code_submissions` table
#[derive(Clone)]
pub struct PgSubmissionStore {
    pool: PgPool,
}

impl PgSubmissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionStore for PgSubmissionStore {
    async fn insert(&self, submission: NewSubmission) -> AppResult<SubmissionRecord> {
        let record = sqlx::query_as::<_, SubmissionRecord>(
            r#"
            INSERT INTO code_submissions (
                id, code, language, output, error, status,
                execution_time_ms, memory_used_kb, is_correct,
                submitted_at, user_id, session_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&submission.code)
        .bind(&submission.language)
        .bind(&submission.output)
        .bind(&submission.error)
        .bind(&submission.status)
        .bind(submission.execution_time_ms)
        .bind(submission.memory_used_kb)
        .bind(submission.is_correct)
        .bind(submission.submitted_at)
        .bind(&submission.user_id)
        .bind(&submission.session_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SubmissionRecord>> {
        let record = sqlx::query_as::<_, SubmissionRecord>(
            r#"SELECT * FROM code_submissions WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list(
        &self,
        filter: &SubmissionFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<SubmissionRecord>> {
        let records = sqlx::query_as::<_, SubmissionRecord>(
            r#"
            SELECT * FROM code_submissions
            WHERE
                ($1::text IS NULL OR user_id = $1)
                AND ($2::text IS NULL OR session_id = $2)
                AND ($3::text IS NULL OR language = $3)
                AND ($4::text IS NULL OR status = $4)
            ORDER BY submitted_at DESC
            OFFSET $5 LIMIT $6
            "#,
        )
        .bind(&filter.user_id)
        .bind(&filter.session_id)
        .bind(&filter.language)
        .bind(&filter.status)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn recent(&self, limit: i64) -> AppResult<Vec<SubmissionRecord>> {
        let records = sqlx::query_as::<_, SubmissionRecord>(
            r#"
            SELECT * FROM code_submissions
            ORDER BY submitted_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn count(&self, filter: &SubmissionFilter) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM code_submissions
            WHERE
                ($1::text IS NULL OR user_id = $1)
                AND ($2::text IS NULL OR session_id = $2)
                AND ($3::text IS NULL OR language = $3)
                AND ($4::text IS NULL OR status = $4)
            "#,
        )
        .bind(&filter.user_id)
        .bind(&filter.session_id)
        .bind(&filter.language)
        .bind(&filter.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
