use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use super::entities::{Feedback, Submission};

/// 运行 SQL 的返回结果
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SqlExecutionResponse {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
    pub execution_ms: u64,
    pub truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
    // 达到上限时返回的是上一次的结果
    pub attempt_limit_reached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts_remaining: Option<u32>,
}

/// 单题进度
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct QuestionProgress {
    pub question_id: String,
    pub attempts: u32,
    pub last_executed_at: Option<DateTime<Utc>>,
    pub earned_score: f64,
    pub max_score: f64,
    pub completed: bool,
}

/// 发布成绩结果
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct PublishGradesResponse {
    pub updated: u32,
    pub submissions: Vec<Submission>,
    pub message: String,
}

/// 单题统计
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct QuestionSummary {
    pub question_id: String,
    pub average_score: f64,
    pub max_score: f64,
    pub total_attempts: u32,
}

/// 作业集提交概览（教师视角）
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SetSummary {
    pub set_id: String,
    pub total_submissions: u32,
    pub in_progress: u32,
    pub submitted: u32,
    pub graded: u32,
    pub average_score: f64,
    pub max_possible_score: f64,
    pub per_question: Vec<QuestionSummary>,
}
