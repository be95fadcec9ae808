use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::{
    ApiResponse, ErrorCode,
    assignments::requests::{AssignmentListQuery, AssignmentQueryParams},
};
use crate::services::storage_failure;

pub async fn list_assignments(
    service: &AssignmentService,
    query: AssignmentQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = AssignmentListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        course_id: query.course_id,
        teaching_assistant_id: query.teaching_assistant_id,
    };

    match storage.list_assignments_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Assignment list retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to retrieve assignment list",
        )),
    }
}
