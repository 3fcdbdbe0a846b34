use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::submissions::requests::GradeSubmissionRequest;
use crate::services::SubmissionService;

// 懒加载的全局 SubmissionService 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

// 获取提交详情
pub async fn get_submission(req: HttpRequest, path: web::Path<String>) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .get_submission(&req, &path.into_inner())
        .await
}

// 获取提交的单题进度
pub async fn get_progress(req: HttpRequest, path: web::Path<String>) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .get_progress(&req, &path.into_inner())
        .await
}

// 教师评分
pub async fn grade_submission(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .grade_submission(&req, &path.into_inner(), body.into_inner())
        .await
}

// 配置路由
pub fn configure_submissions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/submissions")
            .route("/{id}", web::get().to(get_submission))
            .route("/{id}/progress", web::get().to(get_progress))
            .route("/{id}/grade", web::put().to(grade_submission)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test};
    use serde_json::{Value, json};
    use std::sync::Arc;

    use crate::config::{GradingConfig, RunnerConfig};
    use crate::services::GradingEngine;
    use crate::services::grading::sample::{SAMPLE_SET_ID, sample_record};
    use crate::storage::Storage;
    use crate::storage::memory_storage::MemoryStorage;

    #[actix_web::test]
    async fn test_grade_over_http() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        storage.save_homework_record(sample_record()).await.unwrap();
        let engine = Arc::new(GradingEngine::new(
            storage,
            GradingConfig::default(),
            RunnerConfig::default(),
        ));
        let submission = engine
            .get_submission_for_student(SAMPLE_SET_ID, "student-1")
            .await
            .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(engine.clone()))
                .configure(configure_submissions_routes),
        )
        .await;

        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/submissions/{}/grade", submission.id))
            .set_json(json!({
                "answers": { "q3": { "feedback": { "score": 12, "instructorNotes": "Nice" } } },
                "status": "graded",
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["overallScore"], 12.0);
        assert_eq!(body["data"]["status"], "graded");
        assert_eq!(body["data"]["answers"]["q3"]["feedback"]["instructorNotes"], "Nice");

        let req = test::TestRequest::get()
            .uri("/api/v1/submissions/unknown/progress")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
