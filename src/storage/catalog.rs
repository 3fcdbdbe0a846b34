//! 作业目录缓存
//!
//! 每次评分操作都会读取作业集与题目，这里用 Moka 缓存目录查询，
//! 其余读写直接透传给下层存储。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use super::Storage;
use crate::errors::Result;
use crate::models::{
    analytics::entities::AnalyticsEvent, homework_sets::entities::HomeworkRecord,
    submissions::entities::Submission,
};

pub struct CachedCatalog {
    inner: Arc<dyn Storage>,
    records: Cache<String, HomeworkRecord>,
}

impl CachedCatalog {
    pub fn new(inner: Arc<dyn Storage>, max_capacity: u64, ttl_secs: u64) -> Self {
        let records = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        debug!(
            "CachedCatalog initialized with max capacity: {}, ttl: {}s",
            max_capacity, ttl_secs
        );
        Self { inner, records }
    }
}

#[async_trait]
impl Storage for CachedCatalog {
    async fn find_homework_record(&self, set_id: &str) -> Result<Option<HomeworkRecord>> {
        if let Some(record) = self.records.get(set_id).await {
            debug!("Catalog cache hit: {}", set_id);
            return Ok(Some(record));
        }

        let record = self.inner.find_homework_record(set_id).await?;
        // 不缓存“不存在”，作业集创建后立即可见
        if let Some(record) = &record {
            self.records
                .insert(set_id.to_string(), record.clone())
                .await;
        }
        Ok(record)
    }

    async fn save_homework_record(&self, record: HomeworkRecord) -> Result<()> {
        let set_id = record.set.id.clone();
        self.inner.save_homework_record(record).await?;
        self.records.invalidate(&set_id).await;
        Ok(())
    }

    async fn find_submission(&self, set_id: &str, student_id: &str) -> Result<Option<Submission>> {
        self.inner.find_submission(set_id, student_id).await
    }

    async fn find_submission_by_id(&self, submission_id: &str) -> Result<Option<Submission>> {
        self.inner.find_submission_by_id(submission_id).await
    }

    async fn list_submissions_for_set(&self, set_id: &str) -> Result<Vec<Submission>> {
        self.inner.list_submissions_for_set(set_id).await
    }

    async fn upsert_submission(&self, submission: &Submission) -> Result<()> {
        self.inner.upsert_submission(submission).await
    }

    async fn list_analytics_for_set(&self, set_id: &str) -> Result<Vec<AnalyticsEvent>> {
        self.inner.list_analytics_for_set(set_id).await
    }

    async fn commit_submissions(
        &self,
        submissions: &[Submission],
        event: &AnalyticsEvent,
    ) -> Result<()> {
        self.inner.commit_submissions(submissions, event).await
    }
}
