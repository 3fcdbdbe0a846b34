//! 分析事件查询与作业集概览

use super::GradingEngine;
use super::rubric::clamp_score;
use crate::errors::Result;
use crate::models::analytics::entities::AnalyticsEvent;
use crate::models::homework_sets::entities::HomeworkRecord;
use crate::models::submissions::entities::{Submission, SubmissionStatus};
use crate::models::submissions::responses::{QuestionSummary, SetSummary};

fn average(total: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { total / count as f64 }
}

/// 汇总作业集下所有提交
pub fn summarize(record: &HomeworkRecord, submissions: &[Submission]) -> SetSummary {
    let count_status = |status: SubmissionStatus| {
        submissions.iter().filter(|s| s.status == status).count() as u32
    };

    let per_question = record
        .set
        .question_order
        .iter()
        .map(|question_id| {
            let points = record.points_for(question_id);
            let (score_total, attempts) = submissions
                .iter()
                .filter_map(|s| s.answers.get(question_id))
                .fold((0.0, 0u32), |(score, attempts), answer| {
                    (
                        score + clamp_score(answer.feedback_score(), points),
                        attempts.saturating_add(answer.execution_count),
                    )
                });
            QuestionSummary {
                question_id: question_id.clone(),
                average_score: average(score_total, submissions.len()),
                max_score: points as f64,
                total_attempts: attempts,
            }
        })
        .collect();

    SetSummary {
        set_id: record.set.id.clone(),
        total_submissions: submissions.len() as u32,
        in_progress: count_status(SubmissionStatus::InProgress),
        submitted: count_status(SubmissionStatus::Submitted),
        graded: count_status(SubmissionStatus::Graded),
        average_score: average(
            submissions.iter().map(|s| s.overall_score).sum(),
            submissions.len(),
        ),
        max_possible_score: record.max_possible_score(),
        per_question,
    }
}

impl GradingEngine {
    /// 按追加顺序返回作业集的分析事件，未知作业集返回空列表
    pub async fn list_analytics_for_set(&self, set_id: &str) -> Result<Vec<AnalyticsEvent>> {
        self.storage.list_analytics_for_set(set_id).await
    }

    pub async fn set_summary(&self, set_id: &str) -> Result<SetSummary> {
        let record = self.load_record(set_id).await?;
        let submissions = self.storage.list_submissions_for_set(set_id).await?;
        Ok(summarize(&record, &submissions))
    }
}
