use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{CourseService, ensure_supervisor};
use crate::models::{ApiResponse, ErrorCode, courses::requests::CreateCourseRequest};
use crate::services::{bad_request, storage_failure};
use crate::utils::validate::{validate_course_code, validate_course_name};

pub async fn create_course(
    service: &CourseService,
    mut course_data: CreateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    course_data.code = course_data.code.trim().to_uppercase();
    course_data.name = course_data.name.trim().to_string();

    if let Err(msg) = validate_course_code(&course_data.code) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Err(msg) = validate_course_name(&course_data.name) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request)?;

    if let Err(resp) = ensure_supervisor(&storage, course_data.supervisor_id).await {
        return Ok(resp);
    }

    match storage.create_course(course_data).await {
        Ok(course) => {
            info!("Created course {} ({})", course.code, course.id);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(course, "Course created successfully")))
        }
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::CourseAlreadyExists,
            "Course creation failed",
        )),
    }
}
