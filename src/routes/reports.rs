use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::services::ReportService;
use crate::utils::ReportPeriod;

static REPORT_SERVICE: Lazy<ReportService> = Lazy::new(ReportService::new_lazy);

pub async fn feedback_count(req: HttpRequest, period: ReportPeriod) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.feedback_count(period, &req).await
}

// 配置路由
pub fn configure_report_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/feedback-count")
            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
            .wrap(middlewares::RequireJWT)
            .route("/{month}/{year}", web::get().to(feedback_count)),
    );
}
