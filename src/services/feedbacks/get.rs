use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FeedbackService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{not_found, storage_failure};

pub async fn get_feedback(
    service: &FeedbackService,
    feedback_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_feedback_by_id(feedback_id).await {
        Ok(Some(feedback)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            feedback,
            "Feedback retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::FeedbackNotFound, "Feedback not found")),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to get feedback",
        )),
    }
}
