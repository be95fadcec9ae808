pub mod pagination;
pub mod response;

pub use pagination::{
    PaginatedResponse, PaginationInfo, PaginationQuery, deserialize_optional_string_to_i64,
};
pub use response::ApiResponse;
