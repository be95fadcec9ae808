use crate::models::feedbacks::entities::FeedbackStatus;
use crate::models::ta_profiles::entities::Program;

/// 按培养项目与状态分组后的反馈数量
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackCountRow {
    pub program: Program,
    pub status: FeedbackStatus,
    pub count: u64,
}
