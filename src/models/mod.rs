//! 数据模型定义
//!
//! 每个业务模块分为 `entities`（业务实体）、`requests`（请求参数）和
//! `responses`（响应结构）三部分。

pub mod assignments;
pub mod auth;
pub mod common;
pub mod courses;
pub mod feedbacks;
pub mod reports;
pub mod ta_profiles;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 响应体中的业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    RateLimitExceeded = 1029,

    // 认证与用户
    AuthFailed = 2000,
    UserNotFound = 2001,
    UserAlreadyExists = 2002,
    UserNameInvalid = 2003,
    UserEmailInvalid = 2004,
    UserPasswordInvalid = 2005,
    UserCreationFailed = 2006,
    UserUpdateFailed = 2007,
    UserDeleteFailed = 2008,
    CanNotDeleteCurrentUser = 2009,

    // 课程
    CourseNotFound = 3000,
    CourseAlreadyExists = 3001,
    CourseSupervisorInvalid = 3002,

    // 助教档案
    TaProfileNotFound = 4000,
    TaProfileAlreadyExists = 4001,
    TaProfileUserInvalid = 4002,

    // 助教分配
    AssignmentNotFound = 5000,
    AssignmentAlreadyExists = 5001,

    // 反馈
    FeedbackNotFound = 6000,
    FeedbackAlreadySubmitted = 6001,
    FeedbackPermissionDenied = 6002,
    FeedbackNotEditable = 6003,

    // 报表
    ReportPeriodInvalid = 7000,
}
