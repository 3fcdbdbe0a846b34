use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::submissions::requests::{ExecuteSqlBody, ExecuteSqlRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, validation_response};
use crate::utils::validate_identifier;

/// 运行 SQL
/// POST /homework-sets/{set_id}/execute
///
/// 达到尝试上限时仍返回 200，`attemptLimitReached = true`。
pub async fn execute_sql(
    service: &SubmissionService,
    request: &HttpRequest,
    set_id: String,
    body: ExecuteSqlBody,
) -> ActixResult<HttpResponse> {
    for (kind, value) in [
        ("studentId", body.student_id.as_str()),
        ("questionId", body.question_id.as_str()),
    ] {
        if let Err(e) = validate_identifier(kind, value) {
            return Ok(validation_response(e));
        }
    }
    let engine = service.get_engine(request);

    match engine
        .execute_sql_for_submission(ExecuteSqlRequest::from_body(set_id, body))
        .await
    {
        Ok(result) => {
            let message = if result.attempt_limit_reached {
                "已达到尝试次数上限"
            } else {
                "运行成功"
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(result, message)))
        }
        Err(e) => Ok(error_response(e, ErrorCode::QuestionNotFound)),
    }
}
