use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 分析事件类型（封闭枚举）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub enum AnalyticsEventType {
    #[serde(rename = "runner.save_draft")]
    SaveDraft,
    #[serde(rename = "runner.submit")]
    Submit,
    #[serde(rename = "runner.execute_sql")]
    ExecuteSql,
    #[serde(rename = "builder.grade_update")]
    GradeUpdate,
    #[serde(rename = "builder.publish_grades")]
    PublishGrades,
    #[serde(rename = "builder.preview_execute")]
    PreviewExecute,
}

impl AnalyticsEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsEventType::SaveDraft => "runner.save_draft",
            AnalyticsEventType::Submit => "runner.submit",
            AnalyticsEventType::ExecuteSql => "runner.execute_sql",
            AnalyticsEventType::GradeUpdate => "builder.grade_update",
            AnalyticsEventType::PublishGrades => "builder.publish_grades",
            AnalyticsEventType::PreviewExecute => "builder.preview_execute",
        }
    }
}

impl std::str::FromStr for AnalyticsEventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "runner.save_draft" => Ok(AnalyticsEventType::SaveDraft),
            "runner.submit" => Ok(AnalyticsEventType::Submit),
            "runner.execute_sql" => Ok(AnalyticsEventType::ExecuteSql),
            "builder.grade_update" => Ok(AnalyticsEventType::GradeUpdate),
            "builder.publish_grades" => Ok(AnalyticsEventType::PublishGrades),
            "builder.preview_execute" => Ok(AnalyticsEventType::PreviewExecute),
            other => Err(format!("unknown analytics event type: {other}")),
        }
    }
}

/// 分析事件，创建后不可修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct AnalyticsEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: AnalyticsEventType,
    pub actor_id: String,
    pub set_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub metadata: serde_json::Value,
}

impl AnalyticsEvent {
    pub fn new(event_type: AnalyticsEventType, actor_id: &str, set_id: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            event_type,
            actor_id: actor_id.to_string(),
            set_id: set_id.to_string(),
            question_id: None,
            submission_id: None,
            created_at: Utc::now(),
            metadata: serde_json::Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_question(mut self, question_id: &str) -> Self {
        self.question_id = Some(question_id.to_string());
        self
    }

    pub fn with_submission(mut self, submission_id: &str) -> Self {
        self.submission_id = Some(submission_id.to_string());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}
