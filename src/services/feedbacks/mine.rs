use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FeedbackService;
use crate::models::{
    ApiResponse, ErrorCode,
    feedbacks::{entities::FeedbackPeriod, responses::FeedbackDetailListResponse},
};
use crate::services::{current_user, storage_failure};
use crate::utils::MonthWindow;

pub async fn list_own_feedbacks(
    service: &FeedbackService,
    period: FeedbackPeriod,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    match storage
        .list_ta_feedbacks(user.id, MonthWindow::current(), period)
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            FeedbackDetailListResponse { items },
            "Feedback list retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to retrieve feedback list",
        )),
    }
}
