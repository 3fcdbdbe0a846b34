use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

use super::entities::{
    ExpectedColumn, HomeworkRecord, HomeworkSet, Question, RubricCriterion, Visibility,
};
use crate::config::GradingConfig;

/// 作者提交的题目草稿，分值和尝试次数可省略
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/homework_set.ts")]
pub struct QuestionDraft {
    pub id: String,
    pub prompt: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub expected_result_schema: Vec<ExpectedColumn>,
    #[serde(default)]
    pub grading_rubric: Vec<RubricCriterion>,
    pub dataset_id: String,
    pub max_attempts: Option<u32>,
    pub points: Option<u32>,
}

impl QuestionDraft {
    /// 在构造边界处统一补齐默认值
    pub fn into_question(self, defaults: &GradingConfig) -> Question {
        let points = match self.points {
            Some(points) if points > 0 => points,
            _ => defaults.default_points.max(1),
        };

        Question {
            id: self.id,
            prompt: self.prompt,
            instructions: self.instructions,
            expected_result_schema: self.expected_result_schema,
            grading_rubric: self.grading_rubric,
            dataset_id: self.dataset_id,
            max_attempts: Some(self.max_attempts.unwrap_or(defaults.default_max_attempts)),
            points,
        }
    }
}

/// 作业集草稿（用于初始化示例数据或外部导入）
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/homework_set.ts")]
pub struct HomeworkRecordDraft {
    pub id: String,
    pub title: String,
    pub course_id: String,
    pub due_at: Option<DateTime<Utc>>,
    pub visibility: Option<Visibility>,
    pub questions: Vec<QuestionDraft>,
}

impl HomeworkRecordDraft {
    pub fn into_record(self, defaults: &GradingConfig, now: DateTime<Utc>) -> HomeworkRecord {
        let questions: Vec<Question> = self
            .questions
            .into_iter()
            .map(|draft| draft.into_question(defaults))
            .collect();
        let visibility = self.visibility.unwrap_or(Visibility::Draft);

        HomeworkRecord {
            set: HomeworkSet {
                id: self.id,
                title: self.title,
                course_id: self.course_id,
                due_at: self.due_at,
                published: visibility == Visibility::Published,
                question_order: questions.iter().map(|q| q.id.clone()).collect(),
                visibility,
                created_at: now,
                updated_at: now,
            },
            questions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(points: Option<u32>, max_attempts: Option<u32>) -> QuestionDraft {
        QuestionDraft {
            id: "q1".to_string(),
            prompt: "Total revenue per customer".to_string(),
            instructions: String::new(),
            expected_result_schema: vec![],
            grading_rubric: vec![],
            dataset_id: "retail".to_string(),
            max_attempts,
            points,
        }
    }

    #[test]
    fn test_question_defaults_applied_at_boundary() {
        let question = draft(None, None).into_question(&GradingConfig::default());
        assert_eq!(question.points, 10);
        assert_eq!(question.max_attempts, Some(3));
        assert_eq!(question.attempt_ceiling(), Some(3));
    }

    #[test]
    fn test_explicit_values_kept() {
        let question = draft(Some(25), Some(0)).into_question(&GradingConfig::default());
        assert_eq!(question.points, 25);
        assert_eq!(question.max_attempts, Some(0));
        // 0 表示不限次数
        assert_eq!(question.attempt_ceiling(), None);
    }

    #[test]
    fn test_zero_points_replaced_by_default() {
        let question = draft(Some(0), None).into_question(&GradingConfig::default());
        assert_eq!(question.points, 10);
    }

    #[test]
    fn test_record_question_order_follows_drafts() {
        let record = HomeworkRecordDraft {
            id: "set-1".to_string(),
            title: "Joins".to_string(),
            course_id: "db101".to_string(),
            due_at: None,
            visibility: None,
            questions: vec![
                draft(Some(10), None),
                QuestionDraft {
                    id: "q2".to_string(),
                    ..draft(Some(5), None)
                },
            ],
        }
        .into_record(&GradingConfig::default(), Utc::now());

        assert_eq!(record.set.question_order, vec!["q1", "q2"]);
        assert_eq!(record.set.visibility, Visibility::Draft);
        assert!(!record.set.published);
        assert_eq!(record.max_possible_score(), 15.0);
        assert_eq!(record.points_for("missing"), 0);
    }
}
