//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! 嵌套结构（答案、评分细则、题目顺序）以 JSON 文本列存储，时间戳为毫秒。

pub mod prelude;

pub mod analytics_events;
pub mod homework_sets;
pub mod questions;
pub mod submissions;

use chrono::{DateTime, Utc};

pub(crate) fn to_millis(dt: DateTime<Utc>) -> i64 {
    dt.timestamp_millis()
}

pub(crate) fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(ms).unwrap_or_default()
}

pub(crate) fn from_millis_opt(ms: Option<i64>) -> Option<DateTime<Utc>> {
    ms.and_then(DateTime::<Utc>::from_timestamp_millis)
}
