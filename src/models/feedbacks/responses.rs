use super::entities::{Feedback, FeedbackDetail};
use crate::models::assignments::entities::SubmittableAssignment;
use crate::models::common::PaginatedResponse;
use serde::Serialize;

pub type FeedbackListResponse = PaginatedResponse<Feedback>;

// 按时间范围筛选的反馈列表（current / past / approval_current）
#[derive(Debug, Serialize)]
pub struct FeedbackDetailListResponse {
    pub items: Vec<FeedbackDetail>,
}

// 本月可提交反馈的分配列表
#[derive(Debug, Serialize)]
pub struct SubmittableAssignmentListResponse {
    pub items: Vec<SubmittableAssignment>,
}
