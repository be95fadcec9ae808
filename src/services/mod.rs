//! 业务逻辑层
//!
//! 每个资源一个服务结构体，每个操作一个文件。服务从请求的 app data 中取得
//! `Arc<dyn Storage>`，所有结果都包装为 [`ApiResponse`] 信封。

pub mod assignments;
pub mod auth;
pub mod courses;
pub mod feedbacks;
pub mod reports;
pub mod ta_profiles;
pub mod users;

pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use courses::CourseService;
pub use feedbacks::FeedbackService;
pub use reports::ReportService;
pub use ta_profiles::TaProfileService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, error::InternalError, web};
use std::sync::Arc;
use tracing::error;

use crate::errors::TAFeedbackError;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, users::entities::User};
use crate::storage::Storage;

/// 从 app data 取存储实例
pub(crate) fn storage_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            error!("Storage is not registered in app data");
            InternalError::from_response(
                "storage unavailable",
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Storage unavailable",
                )),
            )
            .into()
        })
}

/// 当前登录用户，未经过 RequireJWT 时返回 401
pub(crate) fn current_user(request: &HttpRequest) -> ActixResult<User> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        InternalError::from_response(
            "unauthenticated",
            HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Unauthorized access, please login",
            )),
        )
        .into()
    })
}

/// 存储层错误转换为响应：冲突 409、校验 400、不存在 404，其余 500
///
/// `code` 用于冲突与不存在两种情况。
pub(crate) fn storage_failure(err: TAFeedbackError, code: ErrorCode, context: &str) -> HttpResponse {
    let message = format!("{context}: {}", err.message());
    match err {
        TAFeedbackError::Conflict(_) => {
            HttpResponse::Conflict().json(ApiResponse::error_empty(code, message))
        }
        TAFeedbackError::Validation(_) => HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
        TAFeedbackError::NotFound(_) => {
            HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
        }
        _ => {
            error!("{}", message);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                message,
            ))
        }
    }
}

pub(crate) fn forbidden(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn not_found(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_failure_status_mapping() {
        let resp = storage_failure(
            TAFeedbackError::conflict("dup"),
            ErrorCode::CourseAlreadyExists,
            "Course creation failed",
        );
        assert_eq!(resp.status(), actix_web::http::StatusCode::CONFLICT);

        let resp = storage_failure(
            TAFeedbackError::validation("fk"),
            ErrorCode::CourseSupervisorInvalid,
            "Course creation failed",
        );
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

        let resp = storage_failure(
            TAFeedbackError::database_operation("boom"),
            ErrorCode::CourseNotFound,
            "Course lookup failed",
        );
        assert_eq!(
            resp.status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_current_user_requires_authentication() {
        let req = actix_web::test::TestRequest::default().to_http_request();
        assert!(current_user(&req).is_err());
    }
}
