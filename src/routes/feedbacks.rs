use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::feedbacks::requests::{
    CreateFeedbackRequest, FeedbackQueryParams, UpdateFeedbackRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::FeedbackService;
use crate::utils::SafeIDI64;

static FEEDBACK_SERVICE: Lazy<FeedbackService> = Lazy::new(FeedbackService::new_lazy);

pub async fn list_feedbacks(
    req: HttpRequest,
    query: web::Query<FeedbackQueryParams>,
) -> ActixResult<HttpResponse> {
    FEEDBACK_SERVICE
        .list_feedbacks(query.into_inner(), &req)
        .await
}

pub async fn create_feedback(
    req: HttpRequest,
    feedback_data: web::Json<CreateFeedbackRequest>,
) -> ActixResult<HttpResponse> {
    FEEDBACK_SERVICE
        .create_feedback(feedback_data.into_inner(), &req)
        .await
}

pub async fn get_feedback(req: HttpRequest, feedback_id: SafeIDI64) -> ActixResult<HttpResponse> {
    FEEDBACK_SERVICE.get_feedback(feedback_id.0, &req).await
}

pub async fn update_feedback(
    req: HttpRequest,
    feedback_id: SafeIDI64,
    update_data: web::Json<UpdateFeedbackRequest>,
) -> ActixResult<HttpResponse> {
    FEEDBACK_SERVICE
        .update_feedback(feedback_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_feedback(
    req: HttpRequest,
    feedback_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    FEEDBACK_SERVICE.delete_feedback(feedback_id.0, &req).await
}

pub async fn list_current(req: HttpRequest) -> ActixResult<HttpResponse> {
    FEEDBACK_SERVICE.list_current(&req).await
}

pub async fn list_past(req: HttpRequest) -> ActixResult<HttpResponse> {
    FEEDBACK_SERVICE.list_past(&req).await
}

pub async fn list_submittable(req: HttpRequest) -> ActixResult<HttpResponse> {
    FEEDBACK_SERVICE.list_submittable(&req).await
}

pub async fn list_approval_current(req: HttpRequest) -> ActixResult<HttpResponse> {
    FEEDBACK_SERVICE.list_approval_current(&req).await
}

fn ta_only() -> middlewares::RequireRole {
    middlewares::RequireRole::new_any(UserRole::teaching_assistant_roles())
}

// 配置路由
pub fn configure_feedback_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/feedback")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_feedbacks))
                    .route(
                        web::post().to(create_feedback).wrap(
                            middlewares::RequireRole::new_any(UserRole::feedback_submit_roles()),
                        ),
                    ),
            )
            // 固定路径须在 /{id} 之前注册
            .service(
                web::resource("/current")
                    .wrap(ta_only())
                    .route(web::get().to(list_current)),
            )
            .service(
                web::resource("/past")
                    .wrap(ta_only())
                    .route(web::get().to(list_past)),
            )
            .service(
                web::resource("/submit")
                    .wrap(ta_only())
                    .route(web::get().to(list_submittable)),
            )
            .service(
                web::resource("/approval_current")
                    .wrap(middlewares::RequireRole::new_any(UserRole::supervisor_roles()))
                    .route(web::get().to(list_approval_current)),
            )
            // 修改与删除的权限在服务层按归属判定
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_feedback))
                    .route(web::put().to(update_feedback))
                    .route(web::delete().to(delete_feedback)),
            ),
    );
}
