//! SeaORM 存储实现
//!
//! 生产环境的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod analytics;
mod homework_sets;
mod submissions;

use crate::config::AppConfig;
use crate::errors::{Result, SqlHwError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::from_connection(db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(storage)
    }

    /// 使用已有连接创建存储实例并运行迁移
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| SqlHwError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SqlHwError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| SqlHwError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| SqlHwError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SqlHwError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    analytics::entities::AnalyticsEvent, homework_sets::entities::HomeworkRecord,
    submissions::entities::Submission,
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 作业目录模块
    async fn find_homework_record(&self, set_id: &str) -> Result<Option<HomeworkRecord>> {
        self.find_homework_record_impl(set_id).await
    }

    async fn save_homework_record(&self, record: HomeworkRecord) -> Result<()> {
        self.save_homework_record_impl(record).await
    }

    // 提交模块
    async fn find_submission(&self, set_id: &str, student_id: &str) -> Result<Option<Submission>> {
        self.find_submission_impl(set_id, student_id).await
    }

    async fn find_submission_by_id(&self, submission_id: &str) -> Result<Option<Submission>> {
        self.find_submission_by_id_impl(submission_id).await
    }

    async fn list_submissions_for_set(&self, set_id: &str) -> Result<Vec<Submission>> {
        self.list_submissions_for_set_impl(set_id).await
    }

    async fn upsert_submission(&self, submission: &Submission) -> Result<()> {
        self.upsert_submission_impl(submission).await
    }

    // 分析事件模块
    async fn list_analytics_for_set(&self, set_id: &str) -> Result<Vec<AnalyticsEvent>> {
        self.list_analytics_for_set_impl(set_id).await
    }

    async fn commit_submissions(
        &self,
        submissions: &[Submission],
        event: &AnalyticsEvent,
    ) -> Result<()> {
        self.commit_submissions_impl(submissions, event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analytics::entities::AnalyticsEventType;
    use crate::models::submissions::entities::SqlAnswer;
    use crate::services::grading::sample::sample_record;

    async fn memory_storage() -> SeaOrmStorage {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("connect sqlite memory");
        SeaOrmStorage::from_connection(db)
            .await
            .expect("run migrations")
    }

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("grader.db").unwrap(),
            "sqlite://grader.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/sqlhw").unwrap(),
            "postgres://u:p@localhost/sqlhw"
        );
        assert!(SeaOrmStorage::build_database_url("ftp://nowhere").is_err());
    }

    #[tokio::test]
    async fn test_homework_record_persisted_with_questions() {
        let storage = memory_storage().await;
        let record = sample_record();
        storage.save_homework_record(record.clone()).await.unwrap();

        let loaded = storage
            .find_homework_record(&record.set.id)
            .await
            .unwrap()
            .expect("record exists");
        assert_eq!(loaded.set.question_order, record.set.question_order);
        assert_eq!(loaded.questions.len(), record.questions.len());
        assert_eq!(loaded.question("q1"), record.question("q1"));

        // 再次保存时题目整体替换
        let mut trimmed = record.clone();
        trimmed.questions.retain(|q| q.id != "q3");
        trimmed.set.question_order.retain(|id| id != "q3");
        storage.save_homework_record(trimmed).await.unwrap();
        let loaded = storage
            .find_homework_record(&record.set.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.questions.len(), 2);
        assert!(loaded.question("q3").is_none());
    }

    #[tokio::test]
    async fn test_submission_upsert_and_lookup() {
        let storage = memory_storage().await;
        let record = sample_record();
        storage.save_homework_record(record.clone()).await.unwrap();

        let mut submission = Submission::new(&record.set.id, "student-1", chrono::Utc::now());
        submission.answers.insert(
            "q1".to_string(),
            SqlAnswer {
                sql: "SELECT 1".to_string(),
                execution_count: 1,
                ..Default::default()
            },
        );
        storage.upsert_submission(&submission).await.unwrap();

        submission.overall_score = 4.0;
        storage.upsert_submission(&submission).await.unwrap();

        let found = storage
            .find_submission(&record.set.id, "student-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, submission.id);
        assert_eq!(found.overall_score, 4.0);
        assert_eq!(found.answers["q1"].execution_count, 1);
        assert_eq!(
            storage
                .list_submissions_for_set(&record.set.id)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_analytics_append_order() {
        let storage = memory_storage().await;
        let record = sample_record();
        storage.save_homework_record(record.clone()).await.unwrap();

        for kind in [AnalyticsEventType::SaveDraft, AnalyticsEventType::Submit] {
            let event = AnalyticsEvent::new(kind, "student-1", &record.set.id)
                .with_metadata(serde_json::json!({ "k": 1 }));
            storage.commit_submissions(&[], &event).await.unwrap();
        }

        let events = storage.list_analytics_for_set(&record.set.id).await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, AnalyticsEventType::SaveDraft);
        assert_eq!(events[1].event_type, AnalyticsEventType::Submit);
        assert_eq!(events[1].metadata["k"], 1);
    }

    #[tokio::test]
    async fn test_commit_rolls_back_when_event_insert_fails() {
        let storage = memory_storage().await;
        let record = sample_record();
        storage.save_homework_record(record.clone()).await.unwrap();

        let mut submission = Submission::new(&record.set.id, "student-1", chrono::Utc::now());
        let event = AnalyticsEvent::new(AnalyticsEventType::ExecuteSql, "student-1", &record.set.id);
        storage
            .commit_submissions(std::slice::from_ref(&submission), &event)
            .await
            .unwrap();

        // 复用事件 ID 触发唯一约束，提交的修改必须一起回滚
        submission.overall_score = 10.0;
        let err = storage
            .commit_submissions(std::slice::from_ref(&submission), &event)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E003");

        let stored = storage
            .find_submission_by_id(&submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.overall_score, 0.0);
        assert_eq!(
            storage
                .list_analytics_for_set(&record.set.id)
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
