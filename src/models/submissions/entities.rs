use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 提交状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub enum SubmissionStatus {
    InProgress,
    Submitted,
    Graded,
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SubmissionStatus::InProgress => "in_progress",
            SubmissionStatus::Submitted => "submitted",
            SubmissionStatus::Graded => "graded",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(SubmissionStatus::InProgress),
            "submitted" => Ok(SubmissionStatus::Submitted),
            "graded" => Ok(SubmissionStatus::Graded),
            other => Err(format!("unknown submission status: {other}")),
        }
    }
}

/// 运行结果预览
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct ResultPreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
    pub execution_ms: u64,
    pub truncated: bool,
}

/// 单条评分细则得分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct RubricScore {
    pub criterion_id: String,
    pub earned: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Feedback {
    pub question_id: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor_notes: Option<String>,
    #[serde(default)]
    pub rubric_breakdown: Vec<RubricScore>,
}

impl Feedback {
    pub fn empty(question_id: &str) -> Self {
        Self {
            question_id: question_id.to_string(),
            score: 0.0,
            auto_notes: None,
            instructor_notes: None,
            rubric_breakdown: Vec::new(),
        }
    }
}

/// 单题答案
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SqlAnswer {
    pub sql: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_preview: Option<ResultPreview>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_executed_at: Option<DateTime<Utc>>,
    // 只增不减
    #[serde(default)]
    pub execution_count: u32,
}

impl SqlAnswer {
    pub fn feedback_score(&self) -> f64 {
        self.feedback.as_ref().map(|f| f.score).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Submission {
    pub id: String,
    pub homework_set_id: String,
    pub student_id: String,
    // 最终提交时递增，运行 SQL 不递增
    pub attempt_number: u32,
    pub answers: BTreeMap<String, SqlAnswer>,
    pub overall_score: f64,
    pub status: SubmissionStatus,
    pub submitted_at: Option<DateTime<Utc>>,
    pub graded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Submission {
    /// 新建一份进行中的空提交
    pub fn new(homework_set_id: &str, student_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            homework_set_id: homework_set_id.to_string(),
            student_id: student_id.to_string(),
            attempt_number: 1,
            answers: BTreeMap::new(),
            overall_score: 0.0,
            status: SubmissionStatus::InProgress,
            submitted_at: None,
            graded_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
