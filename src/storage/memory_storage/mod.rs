//! 内存存储实现
//!
//! 参考实现，测试和本地演示使用；进程退出后数据丢失。

use std::sync::{RwLock, RwLockWriteGuard};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::errors::{Result, SqlHwError};
use crate::models::{
    analytics::entities::AnalyticsEvent, homework_sets::entities::HomeworkRecord,
    submissions::entities::Submission,
};
use crate::storage::Storage;

#[derive(Default)]
pub struct MemoryStorage {
    homework_records: DashMap<String, HomeworkRecord>,
    submissions: DashMap<String, Submission>,
    // (作业集ID, 学生ID) -> 提交ID
    submission_index: DashMap<(String, String), String>,
    // 提交写入也持有该写锁，批量提交的检查与写入之间不会被其他写入插入
    analytics: RwLock<Vec<AnalyticsEvent>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn log_writer(&self) -> Result<RwLockWriteGuard<'_, Vec<AnalyticsEvent>>> {
        self.analytics
            .write()
            .map_err(|_| SqlHwError::database_operation("分析事件日志锁已损坏"))
    }

    // 每个 (作业集, 学生) 只允许一个提交 ID
    fn check_owner(&self, submission: &Submission) -> Result<()> {
        let key = (
            submission.homework_set_id.clone(),
            submission.student_id.clone(),
        );
        match self.submission_index.get(&key) {
            Some(existing) if existing.value() != &submission.id => {
                Err(SqlHwError::database_operation(format!(
                    "学生 {} 在作业集 {} 下已存在提交 {}",
                    submission.student_id,
                    submission.homework_set_id,
                    existing.value()
                )))
            }
            _ => Ok(()),
        }
    }

    fn store(&self, submission: &Submission) {
        self.submission_index
            .entry((
                submission.homework_set_id.clone(),
                submission.student_id.clone(),
            ))
            .or_insert_with(|| submission.id.clone());
        self.submissions
            .insert(submission.id.clone(), submission.clone());
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn find_homework_record(&self, set_id: &str) -> Result<Option<HomeworkRecord>> {
        Ok(self.homework_records.get(set_id).map(|r| r.value().clone()))
    }

    async fn save_homework_record(&self, record: HomeworkRecord) -> Result<()> {
        self.homework_records.insert(record.set.id.clone(), record);
        Ok(())
    }

    async fn find_submission(&self, set_id: &str, student_id: &str) -> Result<Option<Submission>> {
        let key = (set_id.to_string(), student_id.to_string());
        let Some(submission_id) = self.submission_index.get(&key).map(|id| id.value().clone())
        else {
            return Ok(None);
        };
        Ok(self
            .submissions
            .get(&submission_id)
            .map(|s| s.value().clone()))
    }

    async fn find_submission_by_id(&self, submission_id: &str) -> Result<Option<Submission>> {
        Ok(self.submissions.get(submission_id).map(|s| s.value().clone()))
    }

    async fn list_submissions_for_set(&self, set_id: &str) -> Result<Vec<Submission>> {
        let mut items: Vec<Submission> = self
            .submissions
            .iter()
            .filter(|s| s.homework_set_id == set_id)
            .map(|s| s.value().clone())
            .collect();
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn upsert_submission(&self, submission: &Submission) -> Result<()> {
        let _log = self.log_writer()?;
        self.check_owner(submission)?;
        self.store(submission);
        Ok(())
    }

    async fn list_analytics_for_set(&self, set_id: &str) -> Result<Vec<AnalyticsEvent>> {
        let events = self
            .analytics
            .read()
            .map_err(|_| SqlHwError::database_operation("分析事件日志锁已损坏"))?;
        Ok(events
            .iter()
            .filter(|e| e.set_id == set_id)
            .cloned()
            .collect())
    }

    async fn commit_submissions(
        &self,
        submissions: &[Submission],
        event: &AnalyticsEvent,
    ) -> Result<()> {
        let mut log = self.log_writer()?;
        for submission in submissions {
            self.check_owner(submission)?;
        }
        for submission in submissions {
            self.store(submission);
        }
        log.push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_upsert_rejects_second_submission_for_same_student() {
        let storage = MemoryStorage::new();
        let first = Submission::new("set-1", "student-1", Utc::now());
        storage.upsert_submission(&first).await.unwrap();

        let duplicate = Submission::new("set-1", "student-1", Utc::now());
        let err = storage.upsert_submission(&duplicate).await.unwrap_err();
        assert_eq!(err.code(), "E003");

        let found = storage
            .find_submission("set-1", "student-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, first.id);
    }

    #[tokio::test]
    async fn test_upsert_overwrites_existing_record() {
        let storage = MemoryStorage::new();
        let mut submission = Submission::new("set-1", "student-1", Utc::now());
        storage.upsert_submission(&submission).await.unwrap();

        submission.overall_score = 7.0;
        storage.upsert_submission(&submission).await.unwrap();

        let found = storage
            .find_submission_by_id(&submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.overall_score, 7.0);
        assert_eq!(storage.list_submissions_for_set("set-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_analytics_filtered_by_set_in_append_order() {
        use crate::models::analytics::entities::AnalyticsEventType;

        let storage = MemoryStorage::new();
        for (set_id, kind) in [
            ("set-1", AnalyticsEventType::SaveDraft),
            ("set-2", AnalyticsEventType::Submit),
            ("set-1", AnalyticsEventType::ExecuteSql),
        ] {
            let event = AnalyticsEvent::new(kind, "student-1", set_id);
            storage.commit_submissions(&[], &event).await.unwrap();
        }

        let events = storage.list_analytics_for_set("set-1").await.unwrap();
        let kinds: Vec<_> = events.iter().map(|e| e.event_type).collect();
        assert_eq!(
            kinds,
            vec![AnalyticsEventType::SaveDraft, AnalyticsEventType::ExecuteSql]
        );
    }

    #[tokio::test]
    async fn test_commit_rejected_batch_applies_nothing() {
        use crate::models::analytics::entities::AnalyticsEventType;

        let storage = MemoryStorage::new();
        let owner = Submission::new("set-1", "student-2", Utc::now());
        storage.upsert_submission(&owner).await.unwrap();

        let mut accepted = Submission::new("set-1", "student-1", Utc::now());
        accepted.overall_score = 9.0;
        let duplicate = Submission::new("set-1", "student-2", Utc::now());
        let event = AnalyticsEvent::new(AnalyticsEventType::PublishGrades, "instructor", "set-1");

        let err = storage
            .commit_submissions(&[accepted.clone(), duplicate], &event)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E003");

        assert!(storage.find_submission_by_id(&accepted.id).await.unwrap().is_none());
        assert!(storage.list_analytics_for_set("set-1").await.unwrap().is_empty());

        storage
            .commit_submissions(std::slice::from_ref(&accepted), &event)
            .await
            .unwrap();
        let stored = storage
            .find_submission("set-1", "student-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.overall_score, 9.0);
        assert_eq!(storage.list_analytics_for_set("set-1").await.unwrap().len(), 1);
    }
}
