//! 分析事件存储操作

use super::SeaOrmStorage;
use super::submissions::upsert_submission_on;
use crate::entity::analytics_events::{ActiveModel, Column, Entity as AnalyticsEvents};
use crate::entity::to_millis;
use crate::errors::{Result, SqlHwError};
use crate::models::analytics::entities::AnalyticsEvent;
use crate::models::submissions::entities::Submission;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 在一个事务内写入提交并追加事件，任何一步失败都整体回滚
    pub async fn commit_submissions_impl(
        &self,
        submissions: &[Submission],
        event: &AnalyticsEvent,
    ) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SqlHwError::database_operation(format!("开启事务失败: {e}")))?;

        for submission in submissions {
            upsert_submission_on(&txn, submission).await?;
        }
        append_event_on(&txn, event).await?;

        txn.commit()
            .await
            .map_err(|e| SqlHwError::database_operation(format!("提交事务失败: {e}")))
    }

    /// 按追加顺序列出事件
    pub async fn list_analytics_for_set_impl(&self, set_id: &str) -> Result<Vec<AnalyticsEvent>> {
        AnalyticsEvents::find()
            .filter(Column::SetId.eq(set_id))
            .order_by_asc(Column::Seq)
            .all(&self.db)
            .await
            .map_err(|e| SqlHwError::database_operation(format!("查询分析事件失败: {e}")))?
            .into_iter()
            .map(|m| m.into_event())
            .collect()
    }
}

/// 在给定连接（或事务）上追加事件
async fn append_event_on<C: ConnectionTrait>(conn: &C, event: &AnalyticsEvent) -> Result<()> {
    let model = ActiveModel {
        event_id: Set(event.id.clone()),
        event_type: Set(event.event_type.as_str().to_string()),
        actor_id: Set(event.actor_id.clone()),
        set_id: Set(event.set_id.clone()),
        question_id: Set(event.question_id.clone()),
        submission_id: Set(event.submission_id.clone()),
        created_at: Set(to_millis(event.created_at)),
        metadata: Set(serde_json::to_string(&event.metadata)?),
        ..Default::default()
    };

    model
        .insert(conn)
        .await
        .map_err(|e| SqlHwError::database_operation(format!("写入分析事件失败: {e}")))?;

    Ok(())
}
