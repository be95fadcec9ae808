use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::ta_profiles::requests::{
    CreateTaProfileRequest, TaProfileQueryParams, UpdateTaProfileRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::TaProfileService;
use crate::utils::SafeIDI64;

static TA_PROFILE_SERVICE: Lazy<TaProfileService> = Lazy::new(TaProfileService::new_lazy);

pub async fn list_profiles(
    req: HttpRequest,
    query: web::Query<TaProfileQueryParams>,
) -> ActixResult<HttpResponse> {
    TA_PROFILE_SERVICE
        .list_profiles(query.into_inner(), &req)
        .await
}

pub async fn create_profile(
    req: HttpRequest,
    profile_data: web::Json<CreateTaProfileRequest>,
) -> ActixResult<HttpResponse> {
    TA_PROFILE_SERVICE
        .create_profile(profile_data.into_inner(), &req)
        .await
}

pub async fn get_profile(req: HttpRequest, profile_id: SafeIDI64) -> ActixResult<HttpResponse> {
    TA_PROFILE_SERVICE.get_profile(profile_id.0, &req).await
}

pub async fn update_profile(
    req: HttpRequest,
    profile_id: SafeIDI64,
    update_data: web::Json<UpdateTaProfileRequest>,
) -> ActixResult<HttpResponse> {
    TA_PROFILE_SERVICE
        .update_profile(profile_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_profile(req: HttpRequest, profile_id: SafeIDI64) -> ActixResult<HttpResponse> {
    TA_PROFILE_SERVICE.delete_profile(profile_id.0, &req).await
}

// 配置路由
pub fn configure_ta_profile_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/ta-profiles")
            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_profiles))
            .route("", web::post().to(create_profile))
            .route("/{id}", web::get().to(get_profile))
            .route("/{id}", web::put().to(update_profile))
            .route("/{id}", web::delete().to(delete_profile)),
    );
}
