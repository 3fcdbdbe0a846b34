pub mod detail;
pub mod draft;
pub mod execute;
pub mod grade;
pub mod progress;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::submissions::requests::{
    DraftAnswersBody, ExecuteSqlBody, GradeSubmissionRequest,
};
use crate::services::GradingEngine;

pub struct SubmissionService {
    engine: Option<Arc<GradingEngine>>,
}

impl SubmissionService {
    pub fn new_lazy() -> Self {
        Self { engine: None }
    }

    pub(crate) fn get_engine(&self, request: &HttpRequest) -> Arc<GradingEngine> {
        if let Some(engine) = &self.engine {
            engine.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<GradingEngine>>>()
                .expect("GradingEngine not found in app data")
                .get_ref()
                .clone()
        }
    }

    /// 保存草稿
    pub async fn save_draft(
        &self,
        request: &HttpRequest,
        set_id: String,
        student_id: String,
        body: DraftAnswersBody,
    ) -> ActixResult<HttpResponse> {
        draft::save_draft(self, request, set_id, student_id, body).await
    }

    /// 最终提交
    pub async fn submit(
        &self,
        request: &HttpRequest,
        set_id: String,
        student_id: String,
        body: DraftAnswersBody,
    ) -> ActixResult<HttpResponse> {
        draft::submit(self, request, set_id, student_id, body).await
    }

    /// 学生视角获取提交（不存在时创建）
    pub async fn get_submission_for_student(
        &self,
        request: &HttpRequest,
        set_id: &str,
        student_id: &str,
    ) -> ActixResult<HttpResponse> {
        detail::get_submission_for_student(self, request, set_id, student_id).await
    }

    /// 按 ID 获取提交
    pub async fn get_submission(
        &self,
        request: &HttpRequest,
        submission_id: &str,
    ) -> ActixResult<HttpResponse> {
        detail::get_submission(self, request, submission_id).await
    }

    /// 运行 SQL
    pub async fn execute_sql(
        &self,
        request: &HttpRequest,
        set_id: String,
        body: ExecuteSqlBody,
    ) -> ActixResult<HttpResponse> {
        execute::execute_sql(self, request, set_id, body).await
    }

    /// 教师评分
    pub async fn grade_submission(
        &self,
        request: &HttpRequest,
        submission_id: &str,
        body: GradeSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        grade::grade_submission(self, request, submission_id, body).await
    }

    /// 学生视角的单题进度
    pub async fn get_progress_for_student(
        &self,
        request: &HttpRequest,
        set_id: &str,
        student_id: &str,
    ) -> ActixResult<HttpResponse> {
        progress::get_progress_for_student(self, request, set_id, student_id).await
    }

    /// 按提交 ID 获取单题进度
    pub async fn get_progress(
        &self,
        request: &HttpRequest,
        submission_id: &str,
    ) -> ActixResult<HttpResponse> {
        progress::get_progress(self, request, submission_id).await
    }
}
