use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TaProfileService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{not_found, storage_failure};

pub async fn delete_profile(
    service: &TaProfileService,
    profile_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_ta_profile(profile_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Teaching assistant profile deleted successfully",
        ))),
        Ok(false) => Ok(not_found(
            ErrorCode::TaProfileNotFound,
            "Teaching assistant profile not found",
        )),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Teaching assistant profile deletion failed",
        )),
    }
}
