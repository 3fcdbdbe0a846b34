pub mod grading;
pub mod homework_sets;
pub mod submissions;

use actix_web::HttpResponse;
use tracing::error;

use crate::errors::SqlHwError;
use crate::models::{ApiResponse, ErrorCode};

pub use grading::GradingEngine;
pub use homework_sets::HomeworkSetService;
pub use submissions::SubmissionService;

/// 将引擎错误映射为 HTTP 响应，`not_found` 为该资源对应的业务错误码
pub(crate) fn error_response(err: SqlHwError, not_found: ErrorCode) -> HttpResponse {
    match err {
        SqlHwError::NotFound(_) => {
            HttpResponse::NotFound().json(ApiResponse::from_error(not_found, &err))
        }
        SqlHwError::Validation(_) => validation_response(err),
        _ => {
            error!("{}", err.format_simple());
            HttpResponse::InternalServerError()
                .json(ApiResponse::from_error(ErrorCode::InternalServerError, &err))
        }
    }
}

/// 请求参数校验失败
pub(crate) fn validation_response(err: SqlHwError) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::from_error(ErrorCode::BadRequest, &err))
}
