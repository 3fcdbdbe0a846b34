//! 业务数据模型
//!
//! - `homework_sets`: 作业集、题目与评分细则（只读目录）
//! - `submissions`: 提交、答案、反馈及相关请求/响应
//! - `analytics`: 只追加的分析事件

pub mod analytics;
pub mod common;
pub mod homework_sets;
pub mod submissions;

pub use common::response::ApiResponse;

use serde::{Deserialize, Serialize};

/// API 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    Success = 0,
    BadRequest = 1000,
    InternalServerError = 1500,
    HomeworkSetNotFound = 3000,
    QuestionNotFound = 3001,
    SubmissionNotFound = 4000,
}
