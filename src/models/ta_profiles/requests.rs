use super::entities::Program;
use crate::models::common::{PaginationQuery, deserialize_optional_string_to_i64};
use serde::Deserialize;

// 助教档案查询参数（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct TaProfileQueryParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    // 培养项目编码 1..=3
    #[serde(default, deserialize_with = "deserialize_optional_string_to_i64")]
    pub program: Option<i64>,
}

// 创建助教档案请求
#[derive(Debug, Deserialize)]
pub struct CreateTaProfileRequest {
    pub user_id: i64,
    pub program: Program,
}

// 更新助教档案请求
#[derive(Debug, Deserialize)]
pub struct UpdateTaProfileRequest {
    pub program: Option<Program>,
}

// 助教档案列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct TaProfileListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub program: Option<Program>,
}
