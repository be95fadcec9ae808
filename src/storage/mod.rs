use std::sync::Arc;

use chrono::NaiveDate;

use crate::models::{
    assignments::{
        entities::{Assignment, SubmittableAssignment, TaAssignView},
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListResponse,
    },
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
    feedbacks::{
        entities::{Feedback, FeedbackDetail, FeedbackOwnership, FeedbackPeriod},
        requests::{FeedbackListQuery, UpdateFeedbackRequest},
        responses::FeedbackListResponse,
    },
    reports::entities::FeedbackCountRow,
    ta_profiles::{
        entities::TeachingAssistantProfile,
        requests::{CreateTaProfileRequest, TaProfileListQuery, UpdateTaProfileRequest},
        responses::TaProfileListResponse,
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::MonthWindow;

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 字段需已是哈希值）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    async fn delete_user(&self, id: i64) -> Result<bool>;
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    async fn count_users(&self) -> Result<u64>;

    /// 课程管理方法
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course>;
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>>;
    // 列出课程，可按负责教师筛选
    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse>;
    async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>>;
    async fn delete_course(&self, course_id: i64) -> Result<bool>;

    /// 助教档案管理方法
    async fn create_ta_profile(
        &self,
        profile: CreateTaProfileRequest,
    ) -> Result<TeachingAssistantProfile>;
    async fn get_ta_profile_by_id(&self, profile_id: i64)
    -> Result<Option<TeachingAssistantProfile>>;
    async fn get_ta_profile_by_user_id(
        &self,
        user_id: i64,
    ) -> Result<Option<TeachingAssistantProfile>>;
    async fn list_ta_profiles_with_pagination(
        &self,
        query: TaProfileListQuery,
    ) -> Result<TaProfileListResponse>;
    async fn update_ta_profile(
        &self,
        profile_id: i64,
        update: UpdateTaProfileRequest,
    ) -> Result<Option<TeachingAssistantProfile>>;
    async fn delete_ta_profile(&self, profile_id: i64) -> Result<bool>;
    // 分配助教时展示的全部助教
    async fn list_ta_assign_views(&self) -> Result<Vec<TaAssignView>>;

    /// 助教分配管理方法
    async fn create_assignment(&self, assignment: CreateAssignmentRequest) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse>;
    async fn update_assignment(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool>;
    // 助教在指定月份尚未提交反馈的分配
    async fn list_submittable_assignments(
        &self,
        user_id: i64,
        window: MonthWindow,
    ) -> Result<Vec<SubmittableAssignment>>;

    /// 反馈管理方法
    // 创建反馈；同一分配在同一自然月已有反馈时返回 Conflict
    async fn create_feedback(
        &self,
        assignment_id: i64,
        content: String,
        date_submitted: NaiveDate,
    ) -> Result<Feedback>;
    async fn get_feedback_by_id(&self, feedback_id: i64) -> Result<Option<Feedback>>;
    // 反馈及其所属助教、课程负责教师
    async fn get_feedback_ownership(&self, feedback_id: i64) -> Result<Option<FeedbackOwnership>>;
    async fn list_feedbacks_with_pagination(
        &self,
        query: FeedbackListQuery,
    ) -> Result<FeedbackListResponse>;
    async fn update_feedback(
        &self,
        feedback_id: i64,
        update: UpdateFeedbackRequest,
    ) -> Result<Option<Feedback>>;
    async fn delete_feedback(&self, feedback_id: i64) -> Result<bool>;
    // 助教本人的反馈（本月或本月以外）
    async fn list_ta_feedbacks(
        &self,
        user_id: i64,
        window: MonthWindow,
        period: FeedbackPeriod,
    ) -> Result<Vec<FeedbackDetail>>;
    // 负责教师名下本月待审核的反馈
    async fn list_pending_feedbacks_for_supervisor(
        &self,
        user_id: i64,
        window: MonthWindow,
    ) -> Result<Vec<FeedbackDetail>>;

    /// 报表
    async fn count_feedbacks_by_program_and_status(
        &self,
        window: MonthWindow,
    ) -> Result<Vec<FeedbackCountRow>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
