//! 作业集实体

use sea_orm::entity::prelude::*;

use crate::errors::{Result as SqlHwResult, SqlHwError};
use crate::models::homework_sets::entities::{HomeworkSet, Visibility};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "homework_sets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub course_id: String,
    pub due_at: Option<i64>,
    pub published: bool,
    // JSON 数组，题目 ID 顺序
    #[sea_orm(column_type = "Text")]
    pub question_order: String,
    pub visibility: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::questions::Entity")]
    Questions,
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
}

impl Related<super::questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Questions.def()
    }
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_homework_set(self) -> SqlHwResult<HomeworkSet> {
        use super::{from_millis, from_millis_opt};

        let question_order: Vec<String> = serde_json::from_str(&self.question_order)?;
        let visibility = self
            .visibility
            .parse::<Visibility>()
            .map_err(SqlHwError::serialization)?;

        Ok(HomeworkSet {
            id: self.id,
            title: self.title,
            course_id: self.course_id,
            due_at: from_millis_opt(self.due_at),
            published: self.published,
            question_order,
            visibility,
            created_at: from_millis(self.created_at),
            updated_at: from_millis(self.updated_at),
        })
    }
}
