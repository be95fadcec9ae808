use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TaProfileService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{not_found, storage_failure};

pub async fn get_profile(
    service: &TaProfileService,
    profile_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_ta_profile_by_id(profile_id).await {
        Ok(Some(profile)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            profile,
            "Teaching assistant profile retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::TaProfileNotFound,
            "Teaching assistant profile not found",
        )),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to get teaching assistant profile",
        )),
    }
}
