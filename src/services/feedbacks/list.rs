use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FeedbackService;
use crate::models::{
    ApiResponse, ErrorCode,
    feedbacks::requests::{FeedbackListQuery, FeedbackQueryParams},
};
use crate::services::storage_failure;

pub async fn list_feedbacks(
    service: &FeedbackService,
    query: FeedbackQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = FeedbackListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        assignment_id: query.assignment_id,
        status: query.status,
    };

    match storage.list_feedbacks_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Feedback list retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to retrieve feedback list",
        )),
    }
}
