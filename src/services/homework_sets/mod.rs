pub mod analytics;
pub mod list;
pub mod publish;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::services::GradingEngine;

/// 教师视角的作业集操作
pub struct HomeworkSetService {
    engine: Option<Arc<GradingEngine>>,
}

impl HomeworkSetService {
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

    /// 列出作业集下的全部提交
    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        set_id: &str,
    ) -> ActixResult<HttpResponse> {
        list::list_submissions(self, request, set_id).await
    }

    /// 发布成绩
    pub async fn publish_grades(
        &self,
        request: &HttpRequest,
        set_id: &str,
        actor_id: Option<String>,
    ) -> ActixResult<HttpResponse> {
        publish::publish_grades(self, request, set_id, actor_id).await
    }

    /// 分析事件
    pub async fn list_analytics(
        &self,
        request: &HttpRequest,
        set_id: &str,
    ) -> ActixResult<HttpResponse> {
        analytics::list_analytics(self, request, set_id).await
    }

    /// 提交概览
    pub async fn get_summary(&self, request: &HttpRequest, set_id: &str) -> ActixResult<HttpResponse> {
        analytics::get_summary(self, request, set_id).await
    }
}
