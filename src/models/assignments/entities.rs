use serde::{Deserialize, Serialize};

use crate::models::courses::entities::CourseBrief;
use crate::models::ta_profiles::entities::Program;

// 助教分配：一门课程与一名助教的关联
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub course_id: i64,
    pub teaching_assistant_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 本月尚可提交反馈的分配
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittableAssignment {
    pub id: i64,
    pub teaching_assistant_id: i64,
    pub course: CourseBrief,
}

/// 分配助教时使用的助教视图
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaAssignView {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub program: Program,
}
