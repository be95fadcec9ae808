use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FeedbackService;
use crate::models::{ApiResponse, ErrorCode, feedbacks::responses::SubmittableAssignmentListResponse};
use crate::services::{current_user, storage_failure};
use crate::utils::MonthWindow;

pub async fn list_submittable(
    service: &FeedbackService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    match storage
        .list_submittable_assignments(user.id, MonthWindow::current())
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubmittableAssignmentListResponse { items },
            "Submittable assignments retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to retrieve submittable assignments",
        )),
    }
}
