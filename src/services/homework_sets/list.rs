use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::HomeworkSetService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

pub async fn list_submissions(
    service: &HomeworkSetService,
    request: &HttpRequest,
    set_id: &str,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request);

    match engine.list_submissions_for_set(set_id).await {
        Ok(submissions) => Ok(HttpResponse::Ok().json(ApiResponse::success(submissions, "查询成功"))),
        Err(e) => Ok(error_response(e, ErrorCode::HomeworkSetNotFound)),
    }
}
