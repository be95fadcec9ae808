pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::users::entities::UserRole;
use crate::models::{
    ErrorCode,
    courses::requests::{CourseQueryParams, CreateCourseRequest, UpdateCourseRequest},
};
use crate::services::{bad_request, storage_failure};
use crate::storage::Storage;

pub struct CourseService {
    storage: Option<Arc<dyn Storage>>,
}

impl CourseService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 全部课程
    pub async fn list_courses(
        &self,
        query: CourseQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_courses(self, query, request).await
    }

    // 当前用户负责的课程
    pub async fn list_current_courses(
        &self,
        query: CourseQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_current_courses(self, query, request).await
    }

    pub async fn get_course(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_course(self, course_id, request).await
    }

    pub async fn create_course(
        &self,
        course_data: CreateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_course(self, course_data, request).await
    }

    pub async fn update_course(
        &self,
        course_id: i64,
        update_data: UpdateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_course(self, course_id, update_data, request).await
    }

    pub async fn delete_course(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_course(self, course_id, request).await
    }
}

/// 负责教师必须是 supervisor 角色的已有用户
pub(crate) async fn ensure_supervisor(
    storage: &Arc<dyn Storage>,
    supervisor_id: i64,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_id(supervisor_id).await {
        Ok(Some(user)) if user.role == UserRole::Supervisor => Ok(()),
        Ok(Some(_)) => Err(bad_request(
            ErrorCode::CourseSupervisorInvalid,
            "Course supervisor must have the supervisor role",
        )),
        Ok(None) => Err(bad_request(
            ErrorCode::CourseSupervisorInvalid,
            "Course supervisor does not exist",
        )),
        Err(e) => Err(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to check course supervisor",
        )),
    }
}
