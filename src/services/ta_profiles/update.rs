use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TaProfileService;
use crate::models::{ApiResponse, ErrorCode, ta_profiles::requests::UpdateTaProfileRequest};
use crate::services::{not_found, storage_failure};

pub async fn update_profile(
    service: &TaProfileService,
    profile_id: i64,
    update_data: UpdateTaProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.update_ta_profile(profile_id, update_data).await {
        Ok(Some(profile)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            profile,
            "Teaching assistant profile updated successfully",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::TaProfileNotFound,
            "Teaching assistant profile not found",
        )),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Teaching assistant profile update failed",
        )),
    }
}
