//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod courses;
mod feedbacks;
mod reports;
mod ta_profiles;
mod users;

#[cfg(test)]
pub(crate) mod test_utils;

use crate::config::AppConfig;
use crate::errors::{TAFeedbackError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| TAFeedbackError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 使用已建立的连接（迁移由调用方负责）
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| TAFeedbackError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| TAFeedbackError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| TAFeedbackError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(TAFeedbackError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 将写操作的数据库错误映射为业务错误：唯一约束冲突为 Conflict，外键失效为 Validation
pub(crate) fn map_write_err(context: &str, err: DbErr) -> TAFeedbackError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            TAFeedbackError::conflict(format!("{context}: {detail}"))
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            TAFeedbackError::validation(format!("{context}: {detail}"))
        }
        _ => TAFeedbackError::database_operation(format!("{context}: {err}")),
    }
}

/// 读操作的数据库错误
pub(crate) fn map_read_err(context: &str, err: DbErr) -> TAFeedbackError {
    TAFeedbackError::database_operation(format!("{context}: {err}"))
}

// Storage trait 实现
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
use crate::storage::Storage;
use crate::utils::MonthWindow;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 课程模块
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(course_id).await
    }

    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(query).await
    }

    async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        self.update_course_impl(course_id, update).await
    }

    async fn delete_course(&self, course_id: i64) -> Result<bool> {
        self.delete_course_impl(course_id).await
    }

    // 助教档案模块
    async fn create_ta_profile(
        &self,
        profile: CreateTaProfileRequest,
    ) -> Result<TeachingAssistantProfile> {
        self.create_ta_profile_impl(profile).await
    }

    async fn get_ta_profile_by_id(
        &self,
        profile_id: i64,
    ) -> Result<Option<TeachingAssistantProfile>> {
        self.get_ta_profile_by_id_impl(profile_id).await
    }

    async fn get_ta_profile_by_user_id(
        &self,
        user_id: i64,
    ) -> Result<Option<TeachingAssistantProfile>> {
        self.get_ta_profile_by_user_id_impl(user_id).await
    }

    async fn list_ta_profiles_with_pagination(
        &self,
        query: TaProfileListQuery,
    ) -> Result<TaProfileListResponse> {
        self.list_ta_profiles_with_pagination_impl(query).await
    }

    async fn update_ta_profile(
        &self,
        profile_id: i64,
        update: UpdateTaProfileRequest,
    ) -> Result<Option<TeachingAssistantProfile>> {
        self.update_ta_profile_impl(profile_id, update).await
    }

    async fn delete_ta_profile(&self, profile_id: i64) -> Result<bool> {
        self.delete_ta_profile_impl(profile_id).await
    }

    async fn list_ta_assign_views(&self) -> Result<Vec<TaAssignView>> {
        self.list_ta_assign_views_impl().await
    }

    // 助教分配模块
    async fn create_assignment(&self, assignment: CreateAssignmentRequest) -> Result<Assignment> {
        self.create_assignment_impl(assignment).await
    }

    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(assignment_id).await
    }

    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        self.list_assignments_with_pagination_impl(query).await
    }

    async fn update_assignment(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(assignment_id, update).await
    }

    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool> {
        self.delete_assignment_impl(assignment_id).await
    }

    async fn list_submittable_assignments(
        &self,
        user_id: i64,
        window: MonthWindow,
    ) -> Result<Vec<SubmittableAssignment>> {
        self.list_submittable_assignments_impl(user_id, window)
            .await
    }

    // 反馈模块
    async fn create_feedback(
        &self,
        assignment_id: i64,
        content: String,
        date_submitted: NaiveDate,
    ) -> Result<Feedback> {
        self.create_feedback_impl(assignment_id, content, date_submitted)
            .await
    }

    async fn get_feedback_by_id(&self, feedback_id: i64) -> Result<Option<Feedback>> {
        self.get_feedback_by_id_impl(feedback_id).await
    }

    async fn get_feedback_ownership(&self, feedback_id: i64) -> Result<Option<FeedbackOwnership>> {
        self.get_feedback_ownership_impl(feedback_id).await
    }

    async fn list_feedbacks_with_pagination(
        &self,
        query: FeedbackListQuery,
    ) -> Result<FeedbackListResponse> {
        self.list_feedbacks_with_pagination_impl(query).await
    }

    async fn update_feedback(
        &self,
        feedback_id: i64,
        update: UpdateFeedbackRequest,
    ) -> Result<Option<Feedback>> {
        self.update_feedback_impl(feedback_id, update).await
    }

    async fn delete_feedback(&self, feedback_id: i64) -> Result<bool> {
        self.delete_feedback_impl(feedback_id).await
    }

    async fn list_ta_feedbacks(
        &self,
        user_id: i64,
        window: MonthWindow,
        period: FeedbackPeriod,
    ) -> Result<Vec<FeedbackDetail>> {
        self.list_ta_feedbacks_impl(user_id, window, period).await
    }

    async fn list_pending_feedbacks_for_supervisor(
        &self,
        user_id: i64,
        window: MonthWindow,
    ) -> Result<Vec<FeedbackDetail>> {
        self.list_pending_feedbacks_for_supervisor_impl(user_id, window)
            .await
    }

    // 报表模块
    async fn count_feedbacks_by_program_and_status(
        &self,
        window: MonthWindow,
    ) -> Result<Vec<FeedbackCountRow>> {
        self.count_feedbacks_by_program_and_status_impl(window)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("tafeedback.db").unwrap(),
            "sqlite://tafeedback.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/ta").unwrap(),
            "postgres://u:p@localhost/ta"
        );
        assert!(SeaOrmStorage::build_database_url("ftp://nowhere").is_err());
    }
}
