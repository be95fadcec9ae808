use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TaProfileService;
use crate::models::{
    ApiResponse, ErrorCode, ta_profiles::requests::CreateTaProfileRequest,
    users::entities::UserRole,
};
use crate::services::{bad_request, storage_failure};

pub async fn create_profile(
    service: &TaProfileService,
    profile_data: CreateTaProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 只有助教角色的用户可以建立档案
    match storage.get_user_by_id(profile_data.user_id).await {
        Ok(Some(user)) if user.role == UserRole::TeachingAssistant => {}
        Ok(Some(_)) => {
            return Ok(bad_request(
                ErrorCode::TaProfileUserInvalid,
                "User must have the teaching_assistant role",
            ));
        }
        Ok(None) => {
            return Ok(bad_request(
                ErrorCode::TaProfileUserInvalid,
                "User does not exist",
            ));
        }
        Err(e) => {
            return Ok(storage_failure(
                e,
                ErrorCode::InternalServerError,
                "Failed to check profile user",
            ));
        }
    }

    match storage.create_ta_profile(profile_data).await {
        Ok(profile) => {
            info!(
                "Created teaching assistant profile {} for user {}",
                profile.id, profile.user_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                profile,
                "Teaching assistant profile created successfully",
            )))
        }
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::TaProfileAlreadyExists,
            "Teaching assistant profile creation failed",
        )),
    }
}
