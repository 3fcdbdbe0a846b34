//! 提交实体

use sea_orm::entity::prelude::*;

use crate::errors::{Result as SqlHwResult, SqlHwError};
use crate::models::submissions::entities::{Submission, SubmissionStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub homework_set_id: String,
    pub student_id: String,
    pub attempt_number: i32,
    // JSON 对象，题目 ID -> 答案
    #[sea_orm(column_type = "Text")]
    pub answers: String,
    pub overall_score: f64,
    pub status: String,
    pub submitted_at: Option<i64>,
    pub graded_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::homework_sets::Entity",
        from = "Column::HomeworkSetId",
        to = "super::homework_sets::Column::Id"
    )]
    HomeworkSet,
}

impl Related<super::homework_sets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HomeworkSet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_submission(self) -> SqlHwResult<Submission> {
        use super::{from_millis, from_millis_opt};

        let status = self
            .status
            .parse::<SubmissionStatus>()
            .map_err(SqlHwError::serialization)?;

        Ok(Submission {
            id: self.id,
            homework_set_id: self.homework_set_id,
            student_id: self.student_id,
            attempt_number: self.attempt_number.max(0) as u32,
            answers: serde_json::from_str(&self.answers)?,
            overall_score: self.overall_score,
            status,
            submitted_at: from_millis_opt(self.submitted_at),
            graded_at: from_millis_opt(self.graded_at),
            created_at: from_millis(self.created_at),
            updated_at: from_millis(self.updated_at),
        })
    }
}
