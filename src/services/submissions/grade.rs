use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::submissions::requests::GradeSubmissionRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

/// 教师评分
/// PUT /submissions/{id}/grade
pub async fn grade_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: &str,
    body: GradeSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request);

    match engine.grade_submission_record(submission_id, body).await {
        Ok(submission) => Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "评分成功"))),
        Err(e) => Ok(error_response(e, ErrorCode::SubmissionNotFound)),
    }
}
