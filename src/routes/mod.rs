use actix_web::web;

pub mod assignments;
pub mod auth;
pub mod courses;
pub mod feedbacks;
pub mod reports;
pub mod ta_profiles;
pub mod users;

pub use assignments::configure_assignment_routes;
pub use auth::configure_auth_routes;
pub use courses::configure_course_routes;
pub use feedbacks::configure_feedback_routes;
pub use reports::configure_report_routes;
pub use ta_profiles::configure_ta_profile_routes;
pub use users::configure_user_routes;

/// 注册全部 API 路由
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_user_routes)
        .configure(configure_course_routes)
        .configure(configure_ta_profile_routes)
        .configure(configure_assignment_routes)
        .configure(configure_feedback_routes)
        .configure(configure_report_routes);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, middleware::NormalizePath, test};
    use serde_json::{Value, json};

    use super::*;
    use crate::models::{
        ta_profiles::entities::Program,
        users::entities::{User, UserRole},
    };
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_utils::{
        assign, create_course, create_ta, create_user, setup_storage,
    };
    use crate::utils::jwt::JwtUtils;

    struct Fixture {
        storage: Arc<dyn Storage>,
        admin: User,
        supervisor: User,
        ta: User,
        assignment_id: i64,
    }

    async fn fixture() -> Fixture {
        let storage = setup_storage().await;
        let admin = create_user(&storage, "route_admin", UserRole::Admin).await;
        let supervisor = create_user(&storage, "route_sup", UserRole::Supervisor).await;
        let course = create_course(&storage, "RT101", supervisor.id).await;
        let (ta, profile) = create_ta(&storage, "route_ta", Program::MTech).await;
        let assignment = assign(&storage, course.id, profile.id).await;

        Fixture {
            storage: Arc::new(storage),
            admin,
            supervisor,
            ta,
            assignment_id: assignment.id,
        }
    }

    fn bearer(user: &User) -> (&'static str, String) {
        let token = JwtUtils::generate_access_token(user.id, &user.role.to_string()).unwrap();
        ("Authorization", format!("Bearer {token}"))
    }

    macro_rules! app {
        ($storage:expr) => {
            test::init_service(
                App::new()
                    .wrap(NormalizePath::trim())
                    .app_data(web::Data::new($storage))
                    .configure(configure_api_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_fixed_feedback_paths_resolve_before_id() {
        let f = fixture().await;
        let app = app!(f.storage.clone());

        for uri in ["/api/v1/feedback/current", "/api/v1/feedback/past"] {
            let req = test::TestRequest::get()
                .uri(uri)
                .insert_header(bearer(&f.ta))
                .to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert!(body["data"]["items"].is_array(), "{uri}: {body}");
        }

        let req = test::TestRequest::get()
            .uri("/api/v1/feedback/submit")
            .insert_header(bearer(&f.ta))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["code"], 0);

        let req = test::TestRequest::get()
            .uri("/api/v1/feedback/approval_current")
            .insert_header(bearer(&f.supervisor))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/v1/assignments/assign")
            .insert_header(bearer(&f.admin))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["data"]["items"].is_array(), "{body}");
    }

    #[actix_web::test]
    async fn test_trailing_slash_paths_are_accepted() {
        let f = fixture().await;
        let app = app!(f.storage.clone());

        let req = test::TestRequest::get()
            .uri("/api/v1/feedback/current/")
            .insert_header(bearer(&f.ta))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/v1/feedback-count/3/2023/")
            .insert_header(bearer(&f.admin))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().map(Vec::len), Some(3));
    }

    #[actix_web::test]
    async fn test_role_gates() {
        let f = fixture().await;
        let app = app!(f.storage.clone());

        let cases = [
            ("/api/v1/feedback/submit", &f.supervisor, StatusCode::FORBIDDEN),
            ("/api/v1/feedback/current", &f.admin, StatusCode::FORBIDDEN),
            ("/api/v1/feedback/approval_current", &f.ta, StatusCode::FORBIDDEN),
            ("/api/v1/courses/current", &f.ta, StatusCode::FORBIDDEN),
            ("/api/v1/feedback-count/3/2023", &f.supervisor, StatusCode::FORBIDDEN),
            ("/api/v1/ta-profiles", &f.ta, StatusCode::FORBIDDEN),
            ("/api/v1/users", &f.supervisor, StatusCode::FORBIDDEN),
            ("/api/v1/courses", &f.ta, StatusCode::OK),
        ];
        for (uri, user, expected) in cases {
            let req = test::TestRequest::get()
                .uri(uri)
                .insert_header(bearer(user))
                .to_request();
            assert_eq!(
                test::call_service(&app, req).await.status(),
                expected,
                "{uri} as {}",
                user.role
            );
        }

        let req = test::TestRequest::get()
            .uri("/api/v1/feedback/current")
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn test_create_feedback_status_mapping() {
        let f = fixture().await;
        let app = app!(f.storage.clone());

        let post = |user: &User, body: Value| {
            test::TestRequest::post()
                .uri("/api/v1/feedback")
                .insert_header(bearer(user))
                .set_json(body)
                .to_request()
        };

        let body = json!({ "assignment_id": f.assignment_id, "content": "Going well" });
        let resp = test::call_service(&app, post(&f.ta, body.clone())).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        // 同月再次提交
        let resp = test::call_service(&app, post(&f.ta, body)).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        // 助教不能指定日期
        let dated = json!({
            "assignment_id": f.assignment_id,
            "content": "Backdated",
            "date_submitted": "2023-03-01"
        });
        let resp = test::call_service(&app, post(&f.ta, dated.clone())).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        // 管理员可补录
        let resp = test::call_service(&app, post(&f.admin, dated)).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let missing = json!({ "assignment_id": 999_999, "content": "Nobody" });
        let resp = test::call_service(&app, post(&f.ta, missing)).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        // 负责教师不能提交
        let body = json!({ "assignment_id": f.assignment_id, "content": "Not mine" });
        let resp = test::call_service(&app, post(&f.supervisor, body)).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
