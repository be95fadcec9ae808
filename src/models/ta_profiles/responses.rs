use super::entities::TeachingAssistantProfile;
use crate::models::common::PaginatedResponse;

pub type TaProfileListResponse = PaginatedResponse<TeachingAssistantProfile>;
