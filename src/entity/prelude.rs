//! 预导入模块，方便使用

pub use super::analytics_events::{
    ActiveModel as AnalyticsEventActiveModel, Entity as AnalyticsEvents,
    Model as AnalyticsEventModel,
};
pub use super::homework_sets::{
    ActiveModel as HomeworkSetActiveModel, Entity as HomeworkSets, Model as HomeworkSetModel,
};
pub use super::questions::{
    ActiveModel as QuestionActiveModel, Entity as Questions, Model as QuestionModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
