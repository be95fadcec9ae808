use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CourseService, ensure_supervisor};
use crate::models::{ApiResponse, ErrorCode, courses::requests::UpdateCourseRequest};
use crate::services::{bad_request, not_found, storage_failure};
use crate::utils::validate::{validate_course_code, validate_course_name};

pub async fn update_course(
    service: &CourseService,
    course_id: i64,
    mut update_data: UpdateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    update_data.code = update_data.code.map(|c| c.trim().to_uppercase());
    update_data.name = update_data.name.map(|n| n.trim().to_string());

    if let Some(code) = update_data.code.as_deref()
        && let Err(msg) = validate_course_code(code)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Some(name) = update_data.name.as_deref()
        && let Err(msg) = validate_course_name(name)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request)?;

    if let Some(supervisor_id) = update_data.supervisor_id
        && let Err(resp) = ensure_supervisor(&storage, supervisor_id).await
    {
        return Ok(resp);
    }

    match storage.update_course(course_id, update_data).await {
        Ok(Some(course)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            course,
            "Course updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::CourseAlreadyExists,
            "Course update failed",
        )),
    }
}
