use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FeedbackService;
use crate::models::{ApiResponse, ErrorCode, feedbacks::responses::FeedbackDetailListResponse};
use crate::services::{current_user, storage_failure};
use crate::utils::MonthWindow;

pub async fn list_approval_current(
    service: &FeedbackService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    match storage
        .list_pending_feedbacks_for_supervisor(user.id, MonthWindow::current())
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            FeedbackDetailListResponse { items },
            "Pending feedback retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to retrieve pending feedback",
        )),
    }
}
