use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde::Serialize;

use super::AssignmentService;
use crate::models::assignments::entities::TaAssignView;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;

#[derive(Debug, Serialize)]
struct TaAssignViewList {
    items: Vec<TaAssignView>,
}

pub async fn list_assign_view(
    service: &AssignmentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_ta_assign_views().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            TaAssignViewList { items },
            "Teaching assistants retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to retrieve teaching assistants",
        )),
    }
}
