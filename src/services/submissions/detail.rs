use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, validation_response};
use crate::utils::validate_identifier;

pub async fn get_submission_for_student(
    service: &SubmissionService,
    request: &HttpRequest,
    set_id: &str,
    student_id: &str,
) -> ActixResult<HttpResponse> {
    if let Err(e) = validate_identifier("studentId", student_id) {
        return Ok(validation_response(e));
    }
    let engine = service.get_engine(request);

    match engine.get_submission_for_student(set_id, student_id).await {
        Ok(submission) => Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "查询成功"))),
        Err(e) => Ok(error_response(e, ErrorCode::HomeworkSetNotFound)),
    }
}

pub async fn get_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: &str,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request);

    match engine.get_submission_by_id(submission_id).await {
        Ok(submission) => Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "查询成功"))),
        Err(e) => Ok(error_response(e, ErrorCode::SubmissionNotFound)),
    }
}
