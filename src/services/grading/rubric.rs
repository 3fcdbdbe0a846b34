//! 评分细则与总分计算

use crate::models::homework_sets::entities::{HomeworkRecord, Question};
use crate::models::submissions::entities::{RubricScore, Submission};

/// 将分数限制在 `[0, points]`
pub fn clamp_score(score: f64, points: u32) -> f64 {
    score.clamp(0.0, points as f64)
}

/// 按细则权重拆分题目得分
///
/// 权重是相对题目分值（而不是 100）的比例：
/// `earned = round(score × weight / max(1, points))`。
pub fn rebuild_rubric_breakdown(question: &Question, score: f64) -> Vec<RubricScore> {
    let divisor = question.points.max(1) as f64;
    question
        .grading_rubric
        .iter()
        .map(|criterion| RubricScore {
            criterion_id: criterion.id.clone(),
            earned: (score * criterion.weight / divisor).round(),
            comments: None,
        })
        .collect()
}

/// 按题目顺序重新计算总分
pub fn recalc_overall_score(submission: &mut Submission, record: &HomeworkRecord) {
    submission.overall_score = record
        .set
        .question_order
        .iter()
        .map(|question_id| {
            let points = record.points_for(question_id);
            let score = submission
                .answers
                .get(question_id)
                .map(|answer| answer.feedback_score())
                .unwrap_or(0.0);
            clamp_score(score, points)
        })
        .sum();
}
