use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{FeedbackService, permissions::check_delete};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, forbidden, not_found, storage_failure};

pub async fn delete_feedback(
    service: &FeedbackService,
    feedback_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let ownership = match storage.get_feedback_ownership(feedback_id).await {
        Ok(Some(ownership)) => ownership,
        Ok(None) => return Ok(not_found(ErrorCode::FeedbackNotFound, "Feedback not found")),
        Err(e) => {
            return Ok(storage_failure(
                e,
                ErrorCode::InternalServerError,
                "Failed to get feedback",
            ));
        }
    };

    if let Err(denied) = check_delete(&user, &ownership) {
        return Ok(forbidden(denied.code, denied.message));
    }

    match storage.delete_feedback(feedback_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Feedback deleted successfully",
        ))),
        Ok(false) => Ok(not_found(ErrorCode::FeedbackNotFound, "Feedback not found")),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Feedback deletion failed",
        )),
    }
}
