//! 分析事件实体（只追加）

use sea_orm::entity::prelude::*;

use crate::errors::{Result as SqlHwResult, SqlHwError};
use crate::models::analytics::entities::{AnalyticsEvent, AnalyticsEventType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "analytics_events")]
pub struct Model {
    // 自增序号，保证追加顺序
    #[sea_orm(primary_key)]
    pub seq: i64,
    #[sea_orm(unique)]
    pub event_id: String,
    pub event_type: String,
    pub actor_id: String,
    pub set_id: String,
    pub question_id: Option<String>,
    pub submission_id: Option<String>,
    pub created_at: i64,
    #[sea_orm(column_type = "Text")]
    pub metadata: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_event(self) -> SqlHwResult<AnalyticsEvent> {
        let event_type = self
            .event_type
            .parse::<AnalyticsEventType>()
            .map_err(SqlHwError::serialization)?;

        Ok(AnalyticsEvent {
            id: self.event_id,
            event_type,
            actor_id: self.actor_id,
            set_id: self.set_id,
            question_id: self.question_id,
            submission_id: self.submission_id,
            created_at: super::from_millis(self.created_at),
            metadata: serde_json::from_str(&self.metadata)?,
        })
    }
}
