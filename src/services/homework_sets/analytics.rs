use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::HomeworkSetService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

pub async fn list_analytics(
    service: &HomeworkSetService,
    request: &HttpRequest,
    set_id: &str,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request);

    match engine.list_analytics_for_set(set_id).await {
        Ok(events) => Ok(HttpResponse::Ok().json(ApiResponse::success(events, "查询成功"))),
        Err(e) => Ok(error_response(e, ErrorCode::HomeworkSetNotFound)),
    }
}

pub async fn get_summary(
    service: &HomeworkSetService,
    request: &HttpRequest,
    set_id: &str,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request);

    match engine.set_summary(set_id).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(ApiResponse::success(summary, "查询成功"))),
        Err(e) => Ok(error_response(e, ErrorCode::HomeworkSetNotFound)),
    }
}
