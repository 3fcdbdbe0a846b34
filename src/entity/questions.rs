//! 题目实体

use sea_orm::entity::prelude::*;

use crate::errors::Result as SqlHwResult;
use crate::models::homework_sets::entities::Question;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub homework_set_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_type = "Text")]
    pub prompt: String,
    #[sea_orm(column_type = "Text")]
    pub instructions: String,
    #[sea_orm(column_type = "Text")]
    pub expected_result_schema: String,
    #[sea_orm(column_type = "Text")]
    pub grading_rubric: String,
    pub dataset_id: String,
    pub max_attempts: Option<i32>,
    pub points: i32,
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
    pub fn into_question(self) -> SqlHwResult<Question> {
        Ok(Question {
            id: self.id,
            prompt: self.prompt,
            instructions: self.instructions,
            expected_result_schema: serde_json::from_str(&self.expected_result_schema)?,
            grading_rubric: serde_json::from_str(&self.grading_rubric)?,
            dataset_id: self.dataset_id,
            max_attempts: self.max_attempts.map(|v| v.max(0) as u32),
            points: self.points.max(0) as u32,
        })
    }
}
