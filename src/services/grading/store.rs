//! 提交的创建、同步与查询

use chrono::Utc;
use tracing::{debug, info};

use super::GradingEngine;
use super::rubric::recalc_overall_score;
use crate::errors::{Result, SqlHwError};
use crate::models::homework_sets::entities::HomeworkRecord;
use crate::models::submissions::entities::{SqlAnswer, Submission};

/// 让答案表的键与题目顺序保持一致：补齐缺失题目，删除已移除的题目
///
/// 返回是否发生了变化；发生变化时总分会重新计算。
pub fn sync_answers(submission: &mut Submission, record: &HomeworkRecord) -> bool {
    let order = &record.set.question_order;
    let before = submission.answers.len();
    submission
        .answers
        .retain(|question_id, _| order.iter().any(|id| id == question_id));
    let mut changed = submission.answers.len() != before;

    for question_id in order {
        if !submission.answers.contains_key(question_id) {
            submission
                .answers
                .insert(question_id.clone(), SqlAnswer::default());
            changed = true;
        }
    }

    if changed {
        recalc_overall_score(submission, record);
    }
    changed
}

impl GradingEngine {
    /// 获取或创建提交，调用方必须已持有该学生的提交锁
    pub(super) async fn ensure_submission_locked(
        &self,
        record: &HomeworkRecord,
        student_id: &str,
    ) -> Result<Submission> {
        let set_id = record.set.id.as_str();
        let (mut submission, created) = match self.storage.find_submission(set_id, student_id).await? {
            Some(existing) => (existing, false),
            None => {
                info!("Creating submission for student {} in set {}", student_id, set_id);
                (Submission::new(set_id, student_id, Utc::now()), true)
            }
        };

        let synced = sync_answers(&mut submission, record);
        if created || synced {
            if synced && !created {
                debug!(
                    "Answers of submission {} re-synced to question order",
                    submission.id
                );
            }
            submission.updated_at = Utc::now();
            self.storage.upsert_submission(&submission).await?;
        }
        Ok(submission)
    }

    /// 获取或创建 (作业集, 学生) 的唯一提交
    pub async fn ensure_submission(&self, set_id: &str, student_id: &str) -> Result<Submission> {
        let record = self.load_record(set_id).await?;
        let _guard = self.lock_submission(set_id, student_id).await;
        self.ensure_submission_locked(&record, student_id).await
    }

    /// 学生视角读取提交，返回独立的副本
    pub async fn get_submission_for_student(
        &self,
        set_id: &str,
        student_id: &str,
    ) -> Result<Submission> {
        self.ensure_submission(set_id, student_id).await
    }

    /// 按 ID 读取提交，读取前同步答案表
    pub async fn get_submission_by_id(&self, submission_id: &str) -> Result<Submission> {
        let submission = self
            .storage
            .find_submission_by_id(submission_id)
            .await?
            .ok_or_else(|| SqlHwError::not_found(format!("提交不存在: {submission_id}")))?;
        self.ensure_submission(&submission.homework_set_id, &submission.student_id)
            .await
    }

    /// 教师视角列出作业集下的全部提交
    pub async fn list_submissions_for_set(&self, set_id: &str) -> Result<Vec<Submission>> {
        let record = self.load_record(set_id).await?;
        let mut submissions = self.storage.list_submissions_for_set(set_id).await?;
        // 只读视图：在副本上同步，不回写
        for submission in &mut submissions {
            sync_answers(submission, &record);
        }
        Ok(submissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submissions::entities::Feedback;
    use crate::services::grading::sample::sample_record;

    #[test]
    fn test_sync_fills_missing_and_prunes_stale() {
        let record = sample_record();
        let mut submission = Submission::new(&record.set.id, "student-1", Utc::now());
        submission.answers.insert(
            "retired".to_string(),
            SqlAnswer {
                sql: "SELECT 1".to_string(),
                ..Default::default()
            },
        );

        assert!(sync_answers(&mut submission, &record));
        let keys: Vec<_> = submission.answers.keys().cloned().collect();
        assert_eq!(keys, vec!["q1", "q2", "q3"]);
        assert!(submission.answers.values().all(|a| a.sql.is_empty()));
        assert!(submission.answers.values().all(|a| a.execution_count == 0));

        // 第二次同步没有变化
        assert!(!sync_answers(&mut submission, &record));
    }

    #[test]
    fn test_sync_recomputes_score_after_prune() {
        let mut record = sample_record();
        let mut submission = Submission::new(&record.set.id, "student-1", Utc::now());
        sync_answers(&mut submission, &record);
        if let Some(answer) = submission.answers.get_mut("q3") {
            answer.feedback = Some(Feedback {
                score: 12.0,
                ..Feedback::empty("q3")
            });
        }
        recalc_overall_score(&mut submission, &record);
        assert_eq!(submission.overall_score, 12.0);

        record.set.question_order.retain(|id| id != "q3");
        assert!(sync_answers(&mut submission, &record));
        assert!(!submission.answers.contains_key("q3"));
        assert_eq!(submission.overall_score, 0.0);
    }
}
