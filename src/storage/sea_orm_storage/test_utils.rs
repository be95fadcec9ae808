//! 存储层测试辅助：内存 SQLite + 迁移

use super::SeaOrmStorage;
use crate::models::{
    assignments::{entities::Assignment, requests::CreateAssignmentRequest},
    courses::{entities::Course, requests::CreateCourseRequest},
    ta_profiles::{
        entities::{Program, TeachingAssistantProfile},
        requests::CreateTaProfileRequest,
    },
    users::{
        entities::{User, UserRole},
        requests::CreateUserRequest,
    },
};
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;

pub(crate) async fn setup_storage() -> SeaOrmStorage {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory db");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    SeaOrmStorage::from_connection(db)
}

pub(crate) async fn create_user(storage: &SeaOrmStorage, username: &str, role: UserRole) -> User {
    storage
        .create_user_impl(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@example.edu"),
            password: "not-a-real-hash".to_string(),
            role,
            display_name: Some(username.to_uppercase()),
        })
        .await
        .expect("create user")
}

pub(crate) async fn create_course(
    storage: &SeaOrmStorage,
    code: &str,
    supervisor_id: i64,
) -> Course {
    storage
        .create_course_impl(CreateCourseRequest {
            code: code.to_string(),
            name: format!("{code} course"),
            supervisor_id,
        })
        .await
        .expect("create course")
}

/// 创建助教用户及其档案
pub(crate) async fn create_ta(
    storage: &SeaOrmStorage,
    username: &str,
    program: Program,
) -> (User, TeachingAssistantProfile) {
    let user = create_user(storage, username, UserRole::TeachingAssistant).await;
    let profile = storage
        .create_ta_profile_impl(CreateTaProfileRequest {
            user_id: user.id,
            program,
        })
        .await
        .expect("create ta profile");
    (user, profile)
}

pub(crate) async fn assign(
    storage: &SeaOrmStorage,
    course_id: i64,
    teaching_assistant_id: i64,
) -> Assignment {
    storage
        .create_assignment_impl(CreateAssignmentRequest {
            course_id,
            teaching_assistant_id,
        })
        .await
        .expect("create assignment")
}
