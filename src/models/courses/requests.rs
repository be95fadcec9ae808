use crate::models::common::PaginationQuery;
use serde::Deserialize;

// 课程查询参数（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct CourseQueryParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

// 创建课程请求
//
// supervisor_id 必须指向 supervisor 角色的用户
#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub code: String,
    pub name: String,
    pub supervisor_id: i64,
}

// 更新课程请求
#[derive(Debug, Deserialize)]
pub struct UpdateCourseRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub supervisor_id: Option<i64>,
}

// 课程列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct CourseListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub supervisor_id: Option<i64>,
    pub search: Option<String>,
}
