use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::submissions::requests::{DraftAnswersBody, SaveDraftRequest, SubmitRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, validation_response};
use crate::utils::validate_identifier;

pub async fn save_draft(
    service: &SubmissionService,
    request: &HttpRequest,
    set_id: String,
    student_id: String,
    body: DraftAnswersBody,
) -> ActixResult<HttpResponse> {
    if let Err(e) = validate_identifier("studentId", &student_id) {
        return Ok(validation_response(e));
    }
    let engine = service.get_engine(request);

    let req = SaveDraftRequest {
        set_id,
        student_id,
        answers: body.answers,
    };
    match engine.save_submission_draft_record(req).await {
        Ok(submission) => Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "草稿已保存"))),
        Err(e) => Ok(error_response(e, ErrorCode::HomeworkSetNotFound)),
    }
}

pub async fn submit(
    service: &SubmissionService,
    request: &HttpRequest,
    set_id: String,
    student_id: String,
    body: DraftAnswersBody,
) -> ActixResult<HttpResponse> {
    if let Err(e) = validate_identifier("studentId", &student_id) {
        return Ok(validation_response(e));
    }
    let engine = service.get_engine(request);

    let req = SubmitRequest {
        set_id,
        student_id,
        answers: body.answers,
    };
    match engine.submit_submission_record(req).await {
        Ok(submission) => Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "提交成功"))),
        Err(e) => Ok(error_response(e, ErrorCode::HomeworkSetNotFound)),
    }
}
