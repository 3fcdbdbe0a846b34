use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 作业集可见性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/homework_set.ts")]
pub enum Visibility {
    Draft,
    Published,
    Archived,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Draft => "draft",
            Visibility::Published => "published",
            Visibility::Archived => "archived",
        }
    }
}

impl std::str::FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Visibility::Draft),
            "published" => Ok(Visibility::Published),
            "archived" => Ok(Visibility::Archived),
            other => Err(format!("unknown visibility: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/homework_set.ts")]
pub struct HomeworkSet {
    pub id: String,
    pub title: String,
    pub course_id: String,
    pub due_at: Option<chrono::DateTime<chrono::Utc>>,
    pub published: bool,
    // 题目顺序，同时决定提交答案表的键集合
    pub question_order: Vec<String>,
    pub visibility: Visibility,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 期望结果集中的一列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/homework_set.ts")]
pub struct ExpectedColumn {
    pub column: String,
    pub data_type: String,
}

/// 评分细则条目，权重是相对题目分值的比例因子
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/homework_set.ts")]
pub struct RubricCriterion {
    pub id: String,
    pub label: String,
    pub description: String,
    pub weight: f64,
    pub auto_graded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/homework_set.ts")]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub instructions: String,
    pub expected_result_schema: Vec<ExpectedColumn>,
    pub grading_rubric: Vec<RubricCriterion>,
    pub dataset_id: String,
    // None 或 0 表示不限次数
    pub max_attempts: Option<u32>,
    pub points: u32,
}

impl Question {
    /// 有效的尝试次数上限
    pub fn attempt_ceiling(&self) -> Option<u32> {
        self.max_attempts.filter(|max| *max > 0)
    }
}

/// 目录查询结果：作业集及其题目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/homework_set.ts")]
pub struct HomeworkRecord {
    pub set: HomeworkSet,
    pub questions: Vec<Question>,
}

impl HomeworkRecord {
    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    /// 题目是否仍在当前题目顺序中
    pub fn is_active_question(&self, question_id: &str) -> bool {
        self.set.question_order.iter().any(|id| id == question_id)
    }

    /// 题目分值，题目缺失时为 0
    pub fn points_for(&self, question_id: &str) -> u32 {
        self.question(question_id).map(|q| q.points).unwrap_or(0)
    }

    /// 按题目顺序累计的满分
    pub fn max_possible_score(&self) -> f64 {
        self.set
            .question_order
            .iter()
            .map(|id| self.points_for(id) as f64)
            .sum()
    }
}
