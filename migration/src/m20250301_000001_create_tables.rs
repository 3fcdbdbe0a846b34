use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建作业集表
        manager
            .create_table(
                Table::create()
                    .table(HomeworkSets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HomeworkSets::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HomeworkSets::Title).string().not_null())
                    .col(ColumnDef::new(HomeworkSets::CourseId).string().not_null())
                    .col(ColumnDef::new(HomeworkSets::DueAt).big_integer().null())
                    .col(
                        ColumnDef::new(HomeworkSets::Published)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(HomeworkSets::QuestionOrder)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(HomeworkSets::Visibility).string().not_null())
                    .col(
                        ColumnDef::new(HomeworkSets::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HomeworkSets::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建题目表
        manager
            .create_table(
                Table::create()
                    .table(Questions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Questions::Id).string().not_null())
                    .col(
                        ColumnDef::new(Questions::HomeworkSetId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Questions::Prompt).text().not_null())
                    .col(ColumnDef::new(Questions::Instructions).text().not_null())
                    .col(
                        ColumnDef::new(Questions::ExpectedResultSchema)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Questions::GradingRubric).text().not_null())
                    .col(ColumnDef::new(Questions::DatasetId).string().not_null())
                    .col(ColumnDef::new(Questions::MaxAttempts).integer().null())
                    .col(ColumnDef::new(Questions::Points).integer().not_null())
                    // 题目 ID 只在作业集内唯一
                    .primary_key(
                        Index::create()
                            .col(Questions::HomeworkSetId)
                            .col(Questions::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Questions::Table, Questions::HomeworkSetId)
                            .to(HomeworkSets::Table, HomeworkSets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建提交表
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submissions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Submissions::HomeworkSetId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::StudentId).string().not_null())
                    .col(
                        ColumnDef::new(Submissions::AttemptNumber)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::Answers).text().not_null())
                    .col(
                        ColumnDef::new(Submissions::OverallScore)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::Status).string().not_null())
                    .col(ColumnDef::new(Submissions::SubmittedAt).big_integer().null())
                    .col(ColumnDef::new(Submissions::GradedAt).big_integer().null())
                    .col(
                        ColumnDef::new(Submissions::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Submissions::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::HomeworkSetId)
                            .to(HomeworkSets::Table, HomeworkSets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建分析事件表（只追加）
        manager
            .create_table(
                Table::create()
                    .table(AnalyticsEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AnalyticsEvents::Seq)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AnalyticsEvents::EventId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(AnalyticsEvents::EventType).string().not_null())
                    .col(ColumnDef::new(AnalyticsEvents::ActorId).string().not_null())
                    .col(ColumnDef::new(AnalyticsEvents::SetId).string().not_null())
                    .col(ColumnDef::new(AnalyticsEvents::QuestionId).string().null())
                    .col(ColumnDef::new(AnalyticsEvents::SubmissionId).string().null())
                    .col(
                        ColumnDef::new(AnalyticsEvents::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AnalyticsEvents::Metadata).text().not_null())
                    .to_owned(),
            )
            .await?;

        // 每个学生在每个作业集下只能有一份提交
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_submissions_set_student")
                    .table(Submissions::Table)
                    .col(Submissions::HomeworkSetId)
                    .col(Submissions::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_questions_homework_set_id")
                    .table(Questions::Table)
                    .col(Questions::HomeworkSetId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_analytics_events_set_id")
                    .table(AnalyticsEvents::Table)
                    .col(AnalyticsEvents::SetId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AnalyticsEvents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Questions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HomeworkSets::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum HomeworkSets {
    #[sea_orm(iden = "homework_sets")]
    Table,
    Id,
    Title,
    CourseId,
    DueAt,
    Published,
    QuestionOrder,
    Visibility,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Questions {
    #[sea_orm(iden = "questions")]
    Table,
    Id,
    HomeworkSetId,
    Prompt,
    Instructions,
    ExpectedResultSchema,
    GradingRubric,
    DatasetId,
    MaxAttempts,
    Points,
}

#[derive(DeriveIden)]
enum Submissions {
    #[sea_orm(iden = "submissions")]
    Table,
    Id,
    HomeworkSetId,
    StudentId,
    AttemptNumber,
    Answers,
    OverallScore,
    Status,
    SubmittedAt,
    GradedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AnalyticsEvents {
    #[sea_orm(iden = "analytics_events")]
    Table,
    Seq,
    EventId,
    EventType,
    ActorId,
    SetId,
    QuestionId,
    SubmissionId,
    CreatedAt,
    Metadata,
}
