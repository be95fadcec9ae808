use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AssignmentService;
use crate::models::{ApiResponse, ErrorCode, assignments::requests::CreateAssignmentRequest};
use crate::services::storage_failure;

pub async fn create_assignment(
    service: &AssignmentService,
    assignment_data: CreateAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 课程或助教不存在时由外键约束拒绝（400），重复分配为 409
    match storage.create_assignment(assignment_data).await {
        Ok(assignment) => {
            info!(
                "Assigned teaching assistant {} to course {}",
                assignment.teaching_assistant_id, assignment.course_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                assignment,
                "Assignment created successfully",
            )))
        }
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::AssignmentAlreadyExists,
            "Assignment creation failed",
        )),
    }
}
