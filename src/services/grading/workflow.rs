//! 草稿、提交、评分与成绩发布

use std::collections::BTreeMap;

use chrono::Utc;
use serde_json::json;
use tracing::info;

use super::GradingEngine;
use super::rubric::{clamp_score, rebuild_rubric_breakdown, recalc_overall_score};
use super::store::sync_answers;
use crate::errors::{Result, SqlHwError};
use crate::models::analytics::entities::{AnalyticsEvent, AnalyticsEventType};
use crate::models::homework_sets::entities::HomeworkRecord;
use crate::models::submissions::entities::{Feedback, Submission, SubmissionStatus};
use crate::models::submissions::requests::{
    AnswerPatch, DraftAnswer, GradeSubmissionRequest, SaveDraftRequest, SubmitRequest,
};
use crate::models::submissions::responses::PublishGradesResponse;

/// 合并学生提交的 SQL，只接受当前题目顺序中的题目
fn merge_sql(
    submission: &mut Submission,
    record: &HomeworkRecord,
    answers: Option<BTreeMap<String, DraftAnswer>>,
) {
    for (question_id, draft) in answers.unwrap_or_default() {
        if !record.is_active_question(&question_id) {
            continue;
        }
        submission.answers.entry(question_id).or_default().sql = draft.sql;
    }
}

/// 教师修改按字段合并到已有答案
fn merge_answer_patch(
    submission: &mut Submission,
    record: &HomeworkRecord,
    question_id: String,
    patch: AnswerPatch,
) {
    if !record.is_active_question(&question_id) {
        return;
    }
    let question = record.question(&question_id);
    let points = record.points_for(&question_id);
    let answer = submission.answers.entry(question_id.clone()).or_default();

    if let Some(sql) = patch.sql {
        answer.sql = sql;
    }

    let Some(feedback_patch) = patch.feedback else {
        return;
    };
    let mut feedback = answer
        .feedback
        .take()
        .unwrap_or_else(|| Feedback::empty(&question_id));

    if let Some(score) = feedback_patch.score {
        feedback.score = clamp_score(score, points);
        if feedback_patch.rubric_breakdown.is_none()
            && let Some(question) = question
        {
            feedback.rubric_breakdown = rebuild_rubric_breakdown(question, feedback.score);
        }
    }
    if let Some(notes) = feedback_patch.auto_notes {
        feedback.auto_notes = Some(notes);
    }
    if let Some(notes) = feedback_patch.instructor_notes {
        feedback.instructor_notes = Some(notes);
    }
    if let Some(breakdown) = feedback_patch.rubric_breakdown {
        feedback.rubric_breakdown = breakdown;
    }
    answer.feedback = Some(feedback);
}

fn publish_message(updated: u32) -> String {
    match updated {
        0 => "All grades were already published.".to_string(),
        1 => "Published 1 grade.".to_string(),
        n => format!("Published {n} grades."),
    }
}

impl GradingEngine {
    /// 保存草稿
    pub async fn save_submission_draft_record(&self, req: SaveDraftRequest) -> Result<Submission> {
        let record = self.load_record(&req.set_id).await?;
        let _guard = self.lock_submission(&req.set_id, &req.student_id).await;

        let mut submission = self.ensure_submission_locked(&record, &req.student_id).await?;
        merge_sql(&mut submission, &record, req.answers);
        recalc_overall_score(&mut submission, &record);
        submission.updated_at = Utc::now();

        self.commit(
            std::slice::from_ref(&submission),
            AnalyticsEvent::new(AnalyticsEventType::SaveDraft, &req.student_id, &req.set_id)
                .with_submission(&submission.id)
                .with_metadata(json!({ "questionCount": submission.answers.len() })),
        )
        .await?;

        Ok(submission)
    }

    /// 最终提交
    pub async fn submit_submission_record(&self, req: SubmitRequest) -> Result<Submission> {
        let record = self.load_record(&req.set_id).await?;
        let _guard = self.lock_submission(&req.set_id, &req.student_id).await;

        let mut submission = self.ensure_submission_locked(&record, &req.student_id).await?;
        merge_sql(&mut submission, &record, req.answers);

        let now = Utc::now();
        submission.status = SubmissionStatus::Submitted;
        submission.submitted_at = Some(now);
        submission.attempt_number = submission.attempt_number.saturating_add(1);
        recalc_overall_score(&mut submission, &record);
        submission.updated_at = now;

        self.commit(
            std::slice::from_ref(&submission),
            AnalyticsEvent::new(AnalyticsEventType::Submit, &req.student_id, &req.set_id)
                .with_submission(&submission.id)
                .with_metadata(json!({
                    "attemptNumber": submission.attempt_number,
                    "overallScore": submission.overall_score,
                })),
        )
        .await?;

        info!(
            "Submission {} submitted by {} (attempt {}, score {})",
            submission.id, req.student_id, submission.attempt_number, submission.overall_score
        );

        Ok(submission)
    }

    /// 教师评分，显式给出的总分（包括 0）原样采用
    pub async fn grade_submission_record(
        &self,
        submission_id: &str,
        payload: GradeSubmissionRequest,
    ) -> Result<Submission> {
        let not_found = || SqlHwError::not_found(format!("提交不存在: {submission_id}"));
        let snapshot = self
            .storage
            .find_submission_by_id(submission_id)
            .await?
            .ok_or_else(not_found)?;
        let record = self.load_record(&snapshot.homework_set_id).await?;

        let _guard = self
            .lock_submission(&snapshot.homework_set_id, &snapshot.student_id)
            .await;

        let mut submission = self
            .storage
            .find_submission_by_id(submission_id)
            .await?
            .ok_or_else(not_found)?;
        sync_answers(&mut submission, &record);

        for (question_id, patch) in payload.answers.unwrap_or_default() {
            merge_answer_patch(&mut submission, &record, question_id, patch);
        }
        if let Some(status) = payload.status {
            submission.status = status;
        }
        match payload.overall_score {
            Some(score) => submission.overall_score = score,
            None => recalc_overall_score(&mut submission, &record),
        }

        let now = Utc::now();
        submission.graded_at = Some(now);
        submission.updated_at = now;

        let actor_id = self.actor_or_system(payload.actor_id);
        self.commit(
            std::slice::from_ref(&submission),
            AnalyticsEvent::new(
                AnalyticsEventType::GradeUpdate,
                &actor_id,
                &submission.homework_set_id,
            )
            .with_submission(&submission.id)
            .with_metadata(json!({
                "overallScore": submission.overall_score,
                "status": submission.status,
            })),
        )
        .await?;

        info!(
            "Submission {} graded by {}: score {}, status {}",
            submission.id, actor_id, submission.overall_score, submission.status
        );

        Ok(submission)
    }

    /// 发布作业集成绩，已评分的提交保持不变，可重复调用
    pub async fn publish_grades_for_set(
        &self,
        set_id: &str,
        actor_id: Option<String>,
    ) -> Result<PublishGradesResponse> {
        let snapshots = self.storage.list_submissions_for_set(set_id).await?;
        if snapshots.is_empty() {
            return Ok(PublishGradesResponse {
                updated: 0,
                submissions: Vec::new(),
                message: "No submissions available to publish.".to_string(),
            });
        }

        let now = Utc::now();
        let total = snapshots.len();

        // 按学生 ID 顺序加锁，整个发布过程持有该作业集的全部提交锁
        let mut students: Vec<&str> = snapshots.iter().map(|s| s.student_id.as_str()).collect();
        students.sort_unstable();
        let mut guards = Vec::with_capacity(students.len());
        for student_id in students {
            guards.push(self.lock_submission(set_id, student_id).await);
        }

        let mut submissions = Vec::with_capacity(total);
        let mut changed = Vec::new();
        for snapshot in snapshots {
            let mut current = self
                .storage
                .find_submission_by_id(&snapshot.id)
                .await?
                .unwrap_or(snapshot);
            if current.status != SubmissionStatus::Graded {
                current.status = SubmissionStatus::Graded;
                current.graded_at = Some(now);
                current.updated_at = now;
                changed.push(current.clone());
            }
            submissions.push(current);
        }
        let updated = changed.len() as u32;

        let actor_id = self.actor_or_system(actor_id);
        self.commit(
            &changed,
            AnalyticsEvent::new(AnalyticsEventType::PublishGrades, &actor_id, set_id)
                .with_metadata(json!({ "updated": updated, "total": total })),
        )
        .await?;
        drop(guards);

        // 发布标记可重复写入，失败后重试发布即可收敛
        if let Some(mut record) = self.storage.find_homework_record(set_id).await?
            && !record.set.published
        {
            record.set.published = true;
            record.set.updated_at = now;
            self.storage.save_homework_record(record).await?;
        }

        info!(
            "Published grades for set {}: {} of {} updated",
            set_id, updated, total
        );

        Ok(PublishGradesResponse {
            updated,
            submissions,
            message: publish_message(updated),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submissions::requests::FeedbackPatch;
    use crate::services::grading::sample::sample_record;

    #[test]
    fn test_publish_message_pluralization() {
        assert_eq!(publish_message(0), "All grades were already published.");
        assert_eq!(publish_message(1), "Published 1 grade.");
        assert_eq!(publish_message(3), "Published 3 grades.");
    }

    #[test]
    fn test_merge_sql_ignores_unknown_questions() {
        let record = sample_record();
        let mut submission = Submission::new(&record.set.id, "student-1", Utc::now());
        sync_answers(&mut submission, &record);

        let mut answers = BTreeMap::new();
        answers.insert(
            "q2".to_string(),
            DraftAnswer {
                sql: "SELECT 2".to_string(),
            },
        );
        answers.insert(
            "ghost".to_string(),
            DraftAnswer {
                sql: "SELECT 3".to_string(),
            },
        );
        merge_sql(&mut submission, &record, Some(answers));

        assert_eq!(submission.answers["q2"].sql, "SELECT 2");
        assert!(!submission.answers.contains_key("ghost"));
    }

    #[test]
    fn test_patch_keeps_sql_and_rebuilds_breakdown() {
        let record = sample_record();
        let mut submission = Submission::new(&record.set.id, "student-1", Utc::now());
        sync_answers(&mut submission, &record);
        if let Some(answer) = submission.answers.get_mut("q1") {
            answer.sql = "SELECT SUM(total) FROM orders".to_string();
        }

        merge_answer_patch(
            &mut submission,
            &record,
            "q1".to_string(),
            AnswerPatch {
                sql: None,
                feedback: Some(FeedbackPatch {
                    score: Some(25.0),
                    instructor_notes: Some("Solid".to_string()),
                    ..Default::default()
                }),
            },
        );

        let answer = &submission.answers["q1"];
        assert_eq!(answer.sql, "SELECT SUM(total) FROM orders");
        let feedback = answer.feedback.as_ref().expect("feedback");
        assert_eq!(feedback.score, 10.0);
        assert_eq!(feedback.instructor_notes.as_deref(), Some("Solid"));
        let earned: Vec<f64> = feedback.rubric_breakdown.iter().map(|r| r.earned).collect();
        assert_eq!(earned, vec![6.0, 4.0]);
    }
}
