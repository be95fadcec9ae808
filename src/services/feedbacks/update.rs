use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{FeedbackService, permissions::check_update};
use crate::models::{ApiResponse, ErrorCode, feedbacks::requests::UpdateFeedbackRequest};
use crate::services::{bad_request, current_user, forbidden, not_found, storage_failure};
use crate::utils::validate::validate_feedback_content;

pub async fn update_feedback(
    service: &FeedbackService,
    feedback_id: i64,
    mut update_data: UpdateFeedbackRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;

    update_data.content = update_data.content.map(|c| c.trim().to_string());
    if let Some(content) = update_data.content.as_deref()
        && let Err(msg) = validate_feedback_content(content)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

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

    if let Err(denied) = check_update(&user, &ownership, &update_data) {
        return Ok(forbidden(denied.code, denied.message));
    }

    let reviewed_to = update_data.status;

    match storage.update_feedback(feedback_id, update_data).await {
        Ok(Some(feedback)) => {
            if let Some(status) = reviewed_to {
                info!("Feedback {} marked {} by user {}", feedback.id, status, user.id);
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                feedback,
                "Feedback updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::FeedbackNotFound, "Feedback not found")),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Feedback update failed",
        )),
    }
}
