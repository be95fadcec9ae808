use super::entities::FeedbackStatus;
use crate::models::common::{PaginationQuery, deserialize_optional_string_to_i64};
use serde::Deserialize;

// 反馈查询参数（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct FeedbackQueryParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_string_to_i64")]
    pub assignment_id: Option<i64>,
    pub status: Option<FeedbackStatus>,
}

/// 提交反馈请求
///
/// `date_submitted` 仅管理员可指定，助教提交时始终取当天日期。
#[derive(Debug, Deserialize)]
pub struct CreateFeedbackRequest {
    pub assignment_id: i64,
    pub content: String,
    pub date_submitted: Option<chrono::NaiveDate>,
}

// 更新反馈请求（内容修改或审核）
#[derive(Debug, Default, Deserialize)]
pub struct UpdateFeedbackRequest {
    pub content: Option<String>,
    pub status: Option<FeedbackStatus>,
    pub remarks: Option<String>,
}

// 反馈列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct FeedbackListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub assignment_id: Option<i64>,
    pub status: Option<FeedbackStatus>,
}
