//! 单题进度视图

use super::GradingEngine;
use super::rubric::clamp_score;
use crate::errors::Result;
use crate::models::homework_sets::entities::HomeworkRecord;
use crate::models::submissions::entities::{Submission, SubmissionStatus};
use crate::models::submissions::responses::QuestionProgress;

/// 按题目顺序生成进度；已提交的作业每道题都视为完成（仅用于展示）
pub fn question_progress(submission: &Submission, record: &HomeworkRecord) -> Vec<QuestionProgress> {
    let finished = submission.status != SubmissionStatus::InProgress;
    record
        .set
        .question_order
        .iter()
        .map(|question_id| {
            let points = record.points_for(question_id);
            let answer = submission.answers.get(question_id);
            let earned_score = clamp_score(
                answer.map(|a| a.feedback_score()).unwrap_or(0.0),
                points,
            );
            QuestionProgress {
                question_id: question_id.clone(),
                attempts: answer.map(|a| a.execution_count).unwrap_or(0),
                last_executed_at: answer.and_then(|a| a.last_executed_at),
                earned_score,
                max_score: points as f64,
                completed: earned_score > 0.0 || finished,
            }
        })
        .collect()
}

impl GradingEngine {
    pub async fn get_submission_progress_for_student(
        &self,
        set_id: &str,
        student_id: &str,
    ) -> Result<Vec<QuestionProgress>> {
        let record = self.load_record(set_id).await?;
        let _guard = self.lock_submission(set_id, student_id).await;
        let submission = self.ensure_submission_locked(&record, student_id).await?;
        Ok(question_progress(&submission, &record))
    }

    pub async fn get_submission_progress_by_id(
        &self,
        submission_id: &str,
    ) -> Result<Vec<QuestionProgress>> {
        let submission = self.get_submission_by_id(submission_id).await?;
        let record = self.load_record(&submission.homework_set_id).await?;
        Ok(question_progress(&submission, &record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submissions::entities::{Feedback, SqlAnswer};
    use crate::services::grading::sample::sample_record;
    use crate::services::grading::sync_answers;
    use chrono::Utc;

    #[test]
    fn test_progress_follows_question_order() {
        let record = sample_record();
        let mut submission = Submission::new(&record.set.id, "student-1", Utc::now());
        sync_answers(&mut submission, &record);
        submission.answers.insert(
            "q2".to_string(),
            SqlAnswer {
                sql: "SELECT 1".to_string(),
                feedback: Some(Feedback {
                    score: 40.0,
                    ..Feedback::empty("q2")
                }),
                execution_count: 2,
                last_executed_at: Some(Utc::now()),
                ..Default::default()
            },
        );

        let progress = question_progress(&submission, &record);
        let ids: Vec<_> = progress.iter().map(|p| p.question_id.as_str()).collect();
        assert_eq!(ids, vec!["q1", "q2", "q3"]);

        assert!(!progress[0].completed);
        assert_eq!(progress[0].attempts, 0);
        assert_eq!(progress[1].earned_score, 10.0);
        assert_eq!(progress[1].max_score, 10.0);
        assert_eq!(progress[1].attempts, 2);
        assert!(progress[1].completed);
        assert!(progress[1].last_executed_at.is_some());
        assert_eq!(progress[2].max_score, 15.0);
    }

    #[test]
    fn test_submitted_marks_every_question_complete() {
        let record = sample_record();
        let mut submission = Submission::new(&record.set.id, "student-1", Utc::now());
        sync_answers(&mut submission, &record);
        submission.status = SubmissionStatus::Submitted;

        let progress = question_progress(&submission, &record);
        assert!(progress.iter().all(|p| p.completed));
        assert!(progress.iter().all(|p| p.earned_score == 0.0));
    }
}
