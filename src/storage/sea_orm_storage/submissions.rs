//! 提交存储操作

use super::SeaOrmStorage;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::entity::to_millis;
use crate::errors::{Result, SqlHwError};
use crate::models::submissions::entities::Submission;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 通过作业集和学生获取提交
    pub async fn find_submission_impl(
        &self,
        set_id: &str,
        student_id: &str,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::HomeworkSetId.eq(set_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| SqlHwError::database_operation(format!("查询提交失败: {e}")))?;

        result.map(|m| m.into_submission()).transpose()
    }

    /// 通过 ID 获取提交
    pub async fn find_submission_by_id_impl(&self, submission_id: &str) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| SqlHwError::database_operation(format!("查询提交失败: {e}")))?;

        result.map(|m| m.into_submission()).transpose()
    }

    /// 列出作业集下所有提交
    pub async fn list_submissions_for_set_impl(&self, set_id: &str) -> Result<Vec<Submission>> {
        Submissions::find()
            .filter(Column::HomeworkSetId.eq(set_id))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SqlHwError::database_operation(format!("查询提交列表失败: {e}")))?
            .into_iter()
            .map(|m| m.into_submission())
            .collect()
    }

    /// 写入提交，(作业集, 学生) 唯一索引保证不会重复创建
    pub async fn upsert_submission_impl(&self, submission: &Submission) -> Result<()> {
        upsert_submission_on(&self.db, submission).await
    }
}

/// 在给定连接（或事务）上写入提交
pub(super) async fn upsert_submission_on<C: ConnectionTrait>(
    conn: &C,
    submission: &Submission,
) -> Result<()> {
    let model = ActiveModel {
        id: Set(submission.id.clone()),
        homework_set_id: Set(submission.homework_set_id.clone()),
        student_id: Set(submission.student_id.clone()),
        attempt_number: Set(submission.attempt_number as i32),
        answers: Set(serde_json::to_string(&submission.answers)?),
        overall_score: Set(submission.overall_score),
        status: Set(submission.status.to_string()),
        submitted_at: Set(submission.submitted_at.map(to_millis)),
        graded_at: Set(submission.graded_at.map(to_millis)),
        created_at: Set(to_millis(submission.created_at)),
        updated_at: Set(to_millis(submission.updated_at)),
    };

    Submissions::insert(model)
        .on_conflict(
            OnConflict::column(Column::Id)
                .update_columns([
                    Column::AttemptNumber,
                    Column::Answers,
                    Column::OverallScore,
                    Column::Status,
                    Column::SubmittedAt,
                    Column::GradedAt,
                    Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await
        .map_err(|e| SqlHwError::database_operation(format!("保存提交失败: {e}")))?;

    Ok(())
}
