use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

pub async fn get_progress_for_student(
    service: &SubmissionService,
    request: &HttpRequest,
    set_id: &str,
    student_id: &str,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request);

    match engine
        .get_submission_progress_for_student(set_id, student_id)
        .await
    {
        Ok(progress) => Ok(HttpResponse::Ok().json(ApiResponse::success(progress, "查询成功"))),
        Err(e) => Ok(error_response(e, ErrorCode::HomeworkSetNotFound)),
    }
}

pub async fn get_progress(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: &str,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request);

    match engine.get_submission_progress_by_id(submission_id).await {
        Ok(progress) => Ok(HttpResponse::Ok().json(ApiResponse::success(progress, "查询成功"))),
        Err(e) => Ok(error_response(e, ErrorCode::SubmissionNotFound)),
    }
}
