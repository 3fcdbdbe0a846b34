//! 提交与评分引擎
//!
//! 负责提交的生命周期、SQL 运行与评估、细则评分、尝试次数上限以及分析事件。
//! 同一 (作业集, 学生) 下的所有写操作在同一把异步锁内完成“读取-计算-写回”。

pub mod analytics;
pub mod execution;
pub mod heuristics;
pub mod progress;
pub mod rubric;
pub mod sample;
mod store;
mod workflow;


use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use crate::config::{GradingConfig, RunnerConfig};
use crate::errors::{Result, SqlHwError};
use crate::models::analytics::entities::AnalyticsEvent;
use crate::models::homework_sets::entities::HomeworkRecord;
use crate::models::submissions::entities::Submission;
use crate::storage::Storage;
use execution::ResultCatalog;
use heuristics::HeuristicRegistry;

pub use store::sync_answers;

pub struct GradingEngine {
    storage: Arc<dyn Storage>,
    // "{set_id}:{student_id}" -> 提交锁
    locks: DashMap<String, Arc<Mutex<()>>>,
    heuristics: HeuristicRegistry,
    results: ResultCatalog,
    grading: GradingConfig,
    runner: RunnerConfig,
}

impl GradingEngine {
    pub fn new(storage: Arc<dyn Storage>, grading: GradingConfig, runner: RunnerConfig) -> Self {
        Self {
            storage,
            locks: DashMap::new(),
            heuristics: HeuristicRegistry::default(),
            results: sample::sample_results(),
            grading,
            runner,
        }
    }

    pub fn with_heuristics(mut self, heuristics: HeuristicRegistry) -> Self {
        self.heuristics = heuristics;
        self
    }

    pub fn with_results(mut self, results: ResultCatalog) -> Self {
        self.results = results;
        self
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// 获取 (作业集, 学生) 的提交锁，守卫释放时顺带清理无人等待的锁
    async fn lock_submission(&self, set_id: &str, student_id: &str) -> SubmissionGuard<'_> {
        let key = format!("{set_id}:{student_id}");
        let lock = self
            .locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        SubmissionGuard {
            locks: &self.locks,
            key,
            guard: Some(lock.lock_owned().await),
        }
    }

    async fn load_record(&self, set_id: &str) -> Result<HomeworkRecord> {
        self.storage
            .find_homework_record(set_id)
            .await?
            .ok_or_else(|| SqlHwError::not_found(format!("作业集不存在: {set_id}")))
    }

    /// 写入提交并记录事件，两者同时生效
    async fn commit(&self, submissions: &[Submission], event: AnalyticsEvent) -> Result<()> {
        debug!(
            "Analytics event {} for set {} by {}",
            event.event_type.as_str(),
            event.set_id,
            event.actor_id
        );
        self.storage.commit_submissions(submissions, &event).await
    }

    fn actor_or_system(&self, actor_id: Option<String>) -> String {
        actor_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| self.grading.system_instructor_id.clone())
    }
}

struct SubmissionGuard<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // 只剩锁表自身持有时说明没有其他任务在等待
        self.locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}
