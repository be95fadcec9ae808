use crate::models::common::{PaginationQuery, deserialize_optional_string_to_i64};
use serde::Deserialize;

// 分配查询参数（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct AssignmentQueryParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_string_to_i64")]
    pub course_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_string_to_i64")]
    pub teaching_assistant_id: Option<i64>,
}

// 创建分配请求
#[derive(Debug, Deserialize)]
pub struct CreateAssignmentRequest {
    pub course_id: i64,
    pub teaching_assistant_id: i64,
}

// 更新分配请求
#[derive(Debug, Deserialize)]
pub struct UpdateAssignmentRequest {
    pub course_id: Option<i64>,
    pub teaching_assistant_id: Option<i64>,
}

// 分配列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct AssignmentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub course_id: Option<i64>,
    pub teaching_assistant_id: Option<i64>,
}
