use crate::config::AppConfig;
use crate::services::GradingEngine;
use crate::services::grading::sample;
use crate::storage::Storage;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub engine: Arc<GradingEngine>,
}

/// 写入示例作业集 "Retail Analytics"
/// 已存在时跳过，不覆盖教师修改过的题目
async fn seed_sample_data(storage: &Arc<dyn Storage>, config: &AppConfig) {
    match storage.find_homework_record(sample::SAMPLE_SET_ID).await {
        Ok(Some(_)) => {
            debug!(
                "Sample homework set '{}' already present, skipping seed",
                sample::SAMPLE_SET_ID
            );
            return;
        }
        Ok(None) => {
            info!("Seeding sample homework set '{}'", sample::SAMPLE_SET_ID);
        }
        Err(e) => {
            warn!("Failed to look up sample homework set: {}, skipping seed", e);
            return;
        }
    }

    let record = sample::sample_draft().into_record(&config.grading, Utc::now());
    match storage.save_homework_record(record).await {
        Ok(()) => info!("Sample homework set seeded"),
        Err(e) => warn!("Failed to seed sample homework set: {}", e),
    }
}

/// 准备服务器启动的上下文
/// 包括存储、目录缓存与评分引擎
pub async fn prepare_server_startup() -> StartupContext {
    let config = AppConfig::get();

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!(
        "Storage backend '{}' initialized and migrations completed",
        config.storage.backend
    );

    if config.app.seed_sample_data {
        seed_sample_data(&storage, config).await;
    }

    let engine = Arc::new(GradingEngine::new(
        storage,
        config.grading.clone(),
        config.runner.clone(),
    ));
    warn!("Grading engine initialized");

    StartupContext { engine }
}
