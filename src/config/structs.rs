use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
    pub catalog: CatalogConfig,
    pub grading: GradingConfig,
    pub runner: RunnerConfig,
    pub cors: CorsConfig,
}

/// 应用设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub system_name: String,
    pub environment: String,
    pub log_level: String,
    pub seed_sample_data: bool, // 启动时写入示例作业集
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub max_workers: usize,
    pub timeouts: TimeoutConfig,
    pub limits: LimitConfig,
}

/// 超时配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    pub client_request: u64,
    pub client_disconnect: u64,
    pub keep_alive: u64,
}

/// 限制配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitConfig {
    pub max_payload_size: usize,
}

/// 存储后端配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: String, // memory | sea_orm
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,    // 数据库连接 URL（从 scheme 自动推断类型）
    pub pool_size: u32, // 连接池大小
    pub timeout: u64,   // 连接超时 (秒)
}

/// 作业目录缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub ttl_secs: u64,
    pub max_capacity: u64,
}

/// 评分默认值
///
/// 仅在由作者草稿构造 `Question` 时使用，评分逻辑本身不做默认。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingConfig {
    pub default_points: u32,
    pub default_max_attempts: u32,
    pub system_instructor_id: String,
}

/// SQL 运行器模拟参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    pub min_latency_ms: u64,
    pub jitter_min: f64,
    pub jitter_max: f64,
    pub max_preview_rows: usize,
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub max_age: usize,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            default_points: 10,
            default_max_attempts: 3,
            system_instructor_id: "system-instructor".to_string(),
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            min_latency_ms: 65,
            jitter_min: 0.85,
            jitter_max: 1.15,
            max_preview_rows: 50,
        }
    }
}
