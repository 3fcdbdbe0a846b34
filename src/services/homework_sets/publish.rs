use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::HomeworkSetService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

/// 发布成绩
/// POST /homework-sets/{set_id}/publish
///
/// 没有提交时同样返回成功，`updated = 0`。
pub async fn publish_grades(
    service: &HomeworkSetService,
    request: &HttpRequest,
    set_id: &str,
    actor_id: Option<String>,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request);

    match engine.publish_grades_for_set(set_id, actor_id).await {
        Ok(result) => {
            let message = result.message.clone();
            Ok(HttpResponse::Ok().json(ApiResponse::success(result, message)))
        }
        Err(e) => Ok(error_response(e, ErrorCode::HomeworkSetNotFound)),
    }
}
