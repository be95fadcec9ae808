use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::FeedbackService;
use crate::models::{
    ApiResponse, ErrorCode, feedbacks::requests::CreateFeedbackRequest,
    users::entities::UserRole,
};
use crate::services::{bad_request, current_user, forbidden, not_found, storage_failure};
use crate::utils::month::today;
use crate::utils::validate::validate_feedback_content;

pub async fn create_feedback(
    service: &FeedbackService,
    feedback_data: CreateFeedbackRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;

    let content = feedback_data.content.trim().to_string();
    if let Err(msg) = validate_feedback_content(&content) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    // 提交日期固定为当天，管理员补录时可指定
    let date_submitted = match (feedback_data.date_submitted, &user.role) {
        (None, _) => today(),
        (Some(date), UserRole::Admin) => date,
        (Some(_), _) => {
            return Ok(forbidden(
                ErrorCode::FeedbackPermissionDenied,
                "Only administrators can set the submission date",
            ));
        }
    };

    let storage = service.get_storage(request)?;

    let assignment = match storage.get_assignment_by_id(feedback_data.assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => return Ok(not_found(ErrorCode::AssignmentNotFound, "Assignment not found")),
        Err(e) => {
            return Ok(storage_failure(
                e,
                ErrorCode::InternalServerError,
                "Failed to get assignment",
            ));
        }
    };

    // 助教只能为自己的分配提交
    if user.role != UserRole::Admin {
        let owns = match storage.get_ta_profile_by_user_id(user.id).await {
            Ok(profile) => profile.is_some_and(|p| p.id == assignment.teaching_assistant_id),
            Err(e) => {
                return Ok(storage_failure(
                    e,
                    ErrorCode::InternalServerError,
                    "Failed to get teaching assistant profile",
                ));
            }
        };
        if !owns {
            return Ok(forbidden(
                ErrorCode::FeedbackPermissionDenied,
                "Assignment does not belong to you",
            ));
        }
    }

    match storage
        .create_feedback(assignment.id, content, date_submitted)
        .await
    {
        Ok(feedback) => {
            info!(
                "Feedback {} submitted for assignment {} on {}",
                feedback.id, feedback.assignment_id, feedback.date_submitted
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                feedback,
                "Feedback submitted successfully",
            )))
        }
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::FeedbackAlreadySubmitted,
            "Feedback submission failed",
        )),
    }
}
