use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::submissions::requests::{DraftAnswersBody, ExecuteSqlBody, PublishGradesBody};
use crate::services::{HomeworkSetService, SubmissionService};

// 懒加载的全局服务实例
static HOMEWORK_SET_SERVICE: Lazy<HomeworkSetService> = Lazy::new(HomeworkSetService::new_lazy);
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

// 保存草稿
pub async fn save_draft(
    req: HttpRequest,
    path: web::Path<(String, String)>, // (set_id, student_id)
    body: web::Json<DraftAnswersBody>,
) -> ActixResult<HttpResponse> {
    let (set_id, student_id) = path.into_inner();
    SUBMISSION_SERVICE
        .save_draft(&req, set_id, student_id, body.into_inner())
        .await
}

// 获取学生的提交
pub async fn get_submission_for_student(
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (set_id, student_id) = path.into_inner();
    SUBMISSION_SERVICE
        .get_submission_for_student(&req, &set_id, &student_id)
        .await
}

// 最终提交，请求体可省略
pub async fn submit(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    body: Option<web::Json<DraftAnswersBody>>,
) -> ActixResult<HttpResponse> {
    let (set_id, student_id) = path.into_inner();
    let body = body.map(|b| b.into_inner()).unwrap_or_default();
    SUBMISSION_SERVICE
        .submit(&req, set_id, student_id, body)
        .await
}

// 学生的单题进度
pub async fn get_progress_for_student(
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (set_id, student_id) = path.into_inner();
    SUBMISSION_SERVICE
        .get_progress_for_student(&req, &set_id, &student_id)
        .await
}

// 运行 SQL
pub async fn execute_sql(
    req: HttpRequest,
    path: web::Path<String>, // set_id
    body: web::Json<ExecuteSqlBody>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .execute_sql(&req, path.into_inner(), body.into_inner())
        .await
}

// 列出作业集下的提交
pub async fn list_submissions(req: HttpRequest, path: web::Path<String>) -> ActixResult<HttpResponse> {
    HOMEWORK_SET_SERVICE
        .list_submissions(&req, &path.into_inner())
        .await
}

// 发布成绩
pub async fn publish_grades(
    req: HttpRequest,
    path: web::Path<String>,
    body: Option<web::Json<PublishGradesBody>>,
) -> ActixResult<HttpResponse> {
    let actor_id = body.and_then(|b| b.into_inner().actor_id);
    HOMEWORK_SET_SERVICE
        .publish_grades(&req, &path.into_inner(), actor_id)
        .await
}

// 分析事件
pub async fn list_analytics(req: HttpRequest, path: web::Path<String>) -> ActixResult<HttpResponse> {
    HOMEWORK_SET_SERVICE
        .list_analytics(&req, &path.into_inner())
        .await
}

// 提交概览
pub async fn get_summary(req: HttpRequest, path: web::Path<String>) -> ActixResult<HttpResponse> {
    HOMEWORK_SET_SERVICE
        .get_summary(&req, &path.into_inner())
        .await
}

// 配置路由
pub fn configure_homework_sets_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/homework-sets/{set_id}")
            .route("/execute", web::post().to(execute_sql))
            .route("/submissions", web::get().to(list_submissions))
            .route("/publish", web::post().to(publish_grades))
            .route("/analytics", web::get().to(list_analytics))
            .route("/summary", web::get().to(get_summary))
            .route(
                "/submissions/{student_id}",
                web::get().to(get_submission_for_student),
            )
            .route("/submissions/{student_id}/draft", web::put().to(save_draft))
            .route("/submissions/{student_id}/submit", web::post().to(submit))
            .route(
                "/submissions/{student_id}/progress",
                web::get().to(get_progress_for_student),
            ),
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

    async fn engine() -> Arc<GradingEngine> {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        storage.save_homework_record(sample_record()).await.unwrap();
        Arc::new(GradingEngine::new(
            storage,
            GradingConfig::default(),
            RunnerConfig::default(),
        ))
    }

    #[actix_web::test]
    async fn test_execute_and_progress_over_http() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(engine().await))
                .configure(configure_homework_sets_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/homework-sets/{SAMPLE_SET_ID}/execute"))
            .set_json(json!({
                "questionId": "q2",
                "studentId": "student-1",
                "sql": "SELECT product_id FROM order_items GROUP BY product_id",
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["code"], 0);
        assert_eq!(body["data"]["feedback"]["score"], 7.0);
        assert_eq!(body["data"]["attemptLimitReached"], false);

        let req = test::TestRequest::get()
            .uri(&format!(
                "/api/v1/homework-sets/{SAMPLE_SET_ID}/submissions/student-1/progress"
            ))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"][1]["questionId"], "q2");
        assert_eq!(body["data"][1]["attempts"], 1);
    }

    #[actix_web::test]
    async fn test_unknown_set_maps_to_404() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(engine().await))
                .configure(configure_homework_sets_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/v1/homework-sets/missing/submissions/student-1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::post()
            .uri("/api/v1/homework-sets/missing/publish")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["updated"], 0);
    }

    #[actix_web::test]
    async fn test_malformed_identifier_maps_to_400() {
        let engine = engine().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(engine.clone()))
                .configure(configure_homework_sets_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/homework-sets/{SAMPLE_SET_ID}/execute"))
            .set_json(json!({
                "questionId": "q1",
                "studentId": "student 1; drop",
                "sql": "SELECT 1",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 1000);
        assert!(body["message"].as_str().unwrap().starts_with("[E004]"));

        let submissions = engine.list_submissions_for_set(SAMPLE_SET_ID).await.unwrap();
        assert!(submissions.is_empty());
    }
}
