//! In-process submission store used when no database is configured

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::SubmissionStore;
use crate::{
    error::AppResult,
    models::{NewSubmission, SubmissionFilter, SubmissionRecord},
};

/// Volatile store; history is lost on restart.
///
/// Meant for development without a database. Records are never evicted, and
/// every query scans, clones and sorts the full history.
#[derive(Default)]
pub struct InMemorySubmissionStore {
    records: RwLock<Vec<SubmissionRecord>>,
}

impl InMemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn newest_first<F>(&self, keep: F) -> Vec<SubmissionRecord>
    where
        F: Fn(&SubmissionRecord) -> bool,
    {
        let records = self.records.read().await;
        let mut matching: Vec<_> = records.iter().filter(|r| keep(r)).cloned().collect();
        matching.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        matching
    }
}

fn window(records: Vec<SubmissionRecord>, offset: i64, limit: i64) -> Vec<SubmissionRecord> {
    records
        .into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    async fn insert(&self, submission: NewSubmission) -> AppResult<SubmissionRecord> {
        let record = submission.into_record();
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SubmissionRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn list(
        &self,
        filter: &SubmissionFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<SubmissionRecord>> {
        let matching = self.newest_first(|r| filter.matches(r)).await;
        Ok(window(matching, offset, limit))
    }

    async fn recent(&self, limit: i64) -> AppResult<Vec<SubmissionRecord>> {
        let all = self.newest_first(|_| true).await;
        Ok(window(all, 0, limit))
    }

    async fn count(&self, filter: &SubmissionFilter) -> AppResult<i64> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| filter.matches(r)).count() as i64)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn submission(session: &str, user: Option<&str>, status: &str, age_secs: i64) -> NewSubmission {
        NewSubmission {
            code: "print(1)".to_string(),
            language: "python".to_string(),
            output: "1".to_string(),
            error: None,
            status: status.to_string(),
            execution_time_ms: 1.0,
            memory_used_kb: 1.0,
            is_correct: None,
            submitted_at: Utc::now() - Duration::seconds(age_secs),
            user_id: user.map(str::to_string),
            session_id: session.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = InMemorySubmissionStore::new();
        let record = store
            .insert(submission("s1", None, "Accepted", 0))
            .await
            .unwrap();

        assert_eq!(store.find_by_id(record.id).await.unwrap(), Some(record));
        assert_eq!(store.find_by_id(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_filters_and_orders_newest_first() {
        let store = InMemorySubmissionStore::new();
        store.insert(submission("s1", None, "Accepted", 30)).await.unwrap();
        store.insert(submission("s1", None, "Error", 10)).await.unwrap();
        store.insert(submission("s1", None, "Accepted", 20)).await.unwrap();
        store.insert(submission("s2", None, "Accepted", 0)).await.unwrap();

        let filter = SubmissionFilter {
            session_id: Some("s1".to_string()),
            ..Default::default()
        };
        let listed = store.list(&filter, 0, 10).await.unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].status, "Error");
        assert!(listed.windows(2).all(|w| w[0].submitted_at >= w[1].submitted_at));

        let page = store.list(&filter, 1, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, listed[1].id);

        let accepted = SubmissionFilter {
            status: Some("Accepted".to_string()),
            ..filter
        };
        assert_eq!(store.count(&accepted).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_recent_spans_all_owners() {
        let store = InMemorySubmissionStore::new();
        for i in 0..12 {
            store
                .insert(submission(&format!("s{i}"), Some("u"), "Accepted", i))
                .await
                .unwrap();
        }

        let recent = store.recent(10).await.unwrap();
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].session_id, "s0");
        assert_eq!(store.count(&SubmissionFilter::default()).await.unwrap(), 12);
    }
}
