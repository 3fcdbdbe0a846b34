use std::collections::BTreeMap;

use serde::Deserialize;
use ts_rs::TS;

use super::entities::{RubricScore, SubmissionStatus};

/// 草稿中的单题 SQL
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct DraftAnswer {
    pub sql: String,
}

/// 保存草稿请求体
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct DraftAnswersBody {
    #[serde(default)]
    pub answers: Option<BTreeMap<String, DraftAnswer>>,
}

// 用于服务层的内部请求
#[derive(Debug, Clone)]
pub struct SaveDraftRequest {
    pub set_id: String,
    pub student_id: String,
    pub answers: Option<BTreeMap<String, DraftAnswer>>,
}

#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub set_id: String,
    pub student_id: String,
    pub answers: Option<BTreeMap<String, DraftAnswer>>,
}

/// 运行 SQL 请求体
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct ExecuteSqlBody {
    #[serde(default)]
    pub submission_id: Option<String>,
    pub question_id: String,
    pub student_id: String,
    #[serde(default)]
    pub sql: String,
    #[serde(default)]
    pub attempt_number: Option<u32>,
    #[serde(default)]
    pub preview: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct ExecuteSqlRequest {
    pub set_id: String,
    pub submission_id: Option<String>,
    pub question_id: String,
    pub student_id: String,
    pub sql: String,
    pub attempt_number: Option<u32>,
    pub preview: bool,
}

impl ExecuteSqlRequest {
    pub fn from_body(set_id: String, body: ExecuteSqlBody) -> Self {
        Self {
            set_id,
            submission_id: body.submission_id,
            question_id: body.question_id,
            student_id: body.student_id,
            sql: body.sql,
            attempt_number: body.attempt_number,
            preview: body.preview.unwrap_or(false),
        }
    }
}

/// 教师对反馈的部分修改
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct FeedbackPatch {
    pub score: Option<f64>,
    pub auto_notes: Option<String>,
    pub instructor_notes: Option<String>,
    pub rubric_breakdown: Option<Vec<RubricScore>>,
}

/// 教师对单题答案的部分修改，可不重新提供 SQL
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct AnswerPatch {
    pub sql: Option<String>,
    pub feedback: Option<FeedbackPatch>,
}

/// 评分请求体
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct GradeSubmissionRequest {
    pub answers: Option<BTreeMap<String, AnswerPatch>>,
    pub status: Option<SubmissionStatus>,
    // 显式给出（包括 0）时原样使用，不再重新计算
    pub overall_score: Option<f64>,
    pub actor_id: Option<String>,
}

/// 发布成绩请求体
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct PublishGradesBody {
    pub actor_id: Option<String>,
}
