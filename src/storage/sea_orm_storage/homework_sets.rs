//! 作业目录存储操作

use super::SeaOrmStorage;
use crate::entity::homework_sets::{ActiveModel, Column, Entity as HomeworkSets};
use crate::entity::questions::{
    ActiveModel as QuestionActiveModel, Column as QuestionColumn, Entity as Questions,
};
use crate::entity::to_millis;
use crate::errors::{Result, SqlHwError};
use crate::models::homework_sets::entities::HomeworkRecord;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};

impl SeaOrmStorage {
    /// 获取作业集及其题目
    pub async fn find_homework_record_impl(&self, set_id: &str) -> Result<Option<HomeworkRecord>> {
        let Some(model) = HomeworkSets::find_by_id(set_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| SqlHwError::database_operation(format!("查询作业集失败: {e}")))?
        else {
            return Ok(None);
        };

        let questions = Questions::find()
            .filter(QuestionColumn::HomeworkSetId.eq(set_id))
            .all(&self.db)
            .await
            .map_err(|e| SqlHwError::database_operation(format!("查询题目失败: {e}")))?
            .into_iter()
            .map(|q| q.into_question())
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(HomeworkRecord {
            set: model.into_homework_set()?,
            questions,
        }))
    }

    /// 写入作业集，题目整体替换
    pub async fn save_homework_record_impl(&self, record: HomeworkRecord) -> Result<()> {
        let HomeworkRecord { set, questions } = record;

        let set_model = ActiveModel {
            id: Set(set.id.clone()),
            title: Set(set.title),
            course_id: Set(set.course_id),
            due_at: Set(set.due_at.map(to_millis)),
            published: Set(set.published),
            question_order: Set(serde_json::to_string(&set.question_order)?),
            visibility: Set(set.visibility.as_str().to_string()),
            created_at: Set(to_millis(set.created_at)),
            updated_at: Set(to_millis(set.updated_at)),
        };

        let mut question_models = Vec::with_capacity(questions.len());
        for question in questions {
            question_models.push(QuestionActiveModel {
                id: Set(question.id),
                homework_set_id: Set(set.id.clone()),
                prompt: Set(question.prompt),
                instructions: Set(question.instructions),
                expected_result_schema: Set(serde_json::to_string(
                    &question.expected_result_schema,
                )?),
                grading_rubric: Set(serde_json::to_string(&question.grading_rubric)?),
                dataset_id: Set(question.dataset_id),
                max_attempts: Set(question.max_attempts.map(|v| v as i32)),
                points: Set(question.points as i32),
            });
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SqlHwError::database_operation(format!("开启事务失败: {e}")))?;

        HomeworkSets::insert(set_model)
            .on_conflict(
                OnConflict::column(Column::Id)
                    .update_columns([
                        Column::Title,
                        Column::CourseId,
                        Column::DueAt,
                        Column::Published,
                        Column::QuestionOrder,
                        Column::Visibility,
                        Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(|e| SqlHwError::database_operation(format!("写入作业集失败: {e}")))?;

        Questions::delete_many()
            .filter(QuestionColumn::HomeworkSetId.eq(set.id.as_str()))
            .exec(&txn)
            .await
            .map_err(|e| SqlHwError::database_operation(format!("清理题目失败: {e}")))?;

        if !question_models.is_empty() {
            Questions::insert_many(question_models)
                .exec_without_returning(&txn)
                .await
                .map_err(|e| SqlHwError::database_operation(format!("写入题目失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| SqlHwError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(())
    }
}
