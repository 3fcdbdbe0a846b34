use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::{Result, SqlHwError};
use crate::models::{
    analytics::entities::AnalyticsEvent, homework_sets::entities::HomeworkRecord,
    submissions::entities::Submission,
};

pub mod catalog;
pub mod memory_storage;
pub mod sea_orm_storage;

/// 评分引擎依赖的持久化能力：查找、写入（upsert）与只追加日志
///
/// 实现必须保证每个 (作业集, 学生) 只有一份提交，分析事件按追加顺序返回。
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 作业目录
    // 获取作业集及其题目
    async fn find_homework_record(&self, set_id: &str) -> Result<Option<HomeworkRecord>>;
    // 写入作业集及其题目（作者端/初始化数据）
    async fn save_homework_record(&self, record: HomeworkRecord) -> Result<()>;

    /// 提交
    // 通过作业集和学生获取提交
    async fn find_submission(&self, set_id: &str, student_id: &str) -> Result<Option<Submission>>;
    // 通过ID获取提交
    async fn find_submission_by_id(&self, submission_id: &str) -> Result<Option<Submission>>;
    // 列出作业集下所有提交（按创建顺序）
    async fn list_submissions_for_set(&self, set_id: &str) -> Result<Vec<Submission>>;
    // 写入提交（不存在则创建）
    async fn upsert_submission(&self, submission: &Submission) -> Result<()>;

    /// 分析事件
    // 按追加顺序列出作业集的事件
    async fn list_analytics_for_set(&self, set_id: &str) -> Result<Vec<AnalyticsEvent>>;

    /// 状态变更与事件一起落库
    // 写入一批提交并追加一条事件，全部成功或全部不生效
    async fn commit_submissions(
        &self,
        submissions: &[Submission],
        event: &AnalyticsEvent,
    ) -> Result<()>;
}

/// 根据配置创建存储后端，并在其前面加一层作业目录缓存
pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let config = AppConfig::get();

    let backend: Arc<dyn Storage> = match config.storage.backend.as_str() {
        "memory" => Arc::new(memory_storage::MemoryStorage::new()),
        "sea_orm" | "database" => Arc::new(sea_orm_storage::SeaOrmStorage::new_async().await?),
        other => {
            return Err(SqlHwError::storage_backend_not_found(format!(
                "未知的存储后端: {other}. 支持: memory, sea_orm"
            )));
        }
    };

    Ok(Arc::new(catalog::CachedCatalog::new(
        backend,
        config.catalog.max_capacity,
        config.catalog.ttl_secs,
    )))
}
