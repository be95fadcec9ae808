//! 用户存储操作

use super::{SeaOrmStorage, map_read_err, map_write_err};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::Result;
use crate::models::{
    PaginationInfo, PaginationQuery,
    users::{
        entities::{User, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            display_name: Set(req.display_name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err("创建用户失败", e))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_err("查询用户失败", e))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名或邮箱获取用户
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(|e| map_read_err("查询用户失败", e))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let (page, size) = PaginationQuery::normalized(query.page, query.size);

        let mut select = Users::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Username.contains(&escaped))
                    .add(Column::Email.contains(&escaped))
                    .add(Column::DisplayName.contains(&escaped)),
            );
        }

        if let Some(ref role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        if let Some(ref status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| map_read_err("查询用户总数失败", e))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| map_read_err("查询用户页数失败", e))?;
        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| map_read_err("查询用户列表失败", e))?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| map_write_err("更新最后登录时间失败", e))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户信息，`password` 需已是哈希值
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        if self.get_user_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(email) = update.email {
            model.email = Set(email);
        }
        if let Some(password) = update.password {
            model.password_hash = Set(password);
        }
        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(display_name) = update.display_name {
            model.display_name = Set(Some(display_name));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| map_write_err("更新用户失败", e))?;

        Ok(Some(updated.into_user()))
    }

    /// 删除用户（级联删除其课程、助教档案及相关数据）
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| map_write_err("删除用户失败", e))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(|e| map_read_err("统计用户数量失败", e))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::{create_user, setup_storage};
    use crate::models::users::{
        entities::{UserRole, UserStatus},
        requests::{UpdateUserRequest, UserListQuery},
    };

    #[tokio::test]
    async fn test_create_and_lookup_user() {
        let storage = setup_storage().await;
        let user = create_user(&storage, "alice", UserRole::Supervisor).await;

        assert_eq!(user.status, UserStatus::Active);
        let by_email = storage
            .get_user_by_username_or_email_impl("alice@example.edu")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);
        assert_eq!(storage.count_users_impl().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let storage = setup_storage().await;
        create_user(&storage, "bob", UserRole::Admin).await;

        let err = storage
            .create_user_impl(crate::models::users::requests::CreateUserRequest {
                username: "bob".to_string(),
                email: "other@example.edu".to_string(),
                password: "x".to_string(),
                role: UserRole::Admin,
                display_name: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E008");
    }

    #[tokio::test]
    async fn test_update_and_filter_by_role() {
        let storage = setup_storage().await;
        let ta = create_user(&storage, "carol", UserRole::TeachingAssistant).await;
        create_user(&storage, "dave", UserRole::Supervisor).await;

        let updated = storage
            .update_user_impl(
                ta.id,
                UpdateUserRequest {
                    email: None,
                    password: None,
                    role: None,
                    status: Some(UserStatus::Suspended),
                    display_name: Some("Carol TA".to_string()),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, UserStatus::Suspended);
        assert_eq!(updated.display_name.as_deref(), Some("Carol TA"));

        let list = storage
            .list_users_with_pagination_impl(UserListQuery {
                role: Some(UserRole::Supervisor),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].username, "dave");
        assert_eq!(list.pagination.total, 1);
    }

    #[tokio::test]
    async fn test_missing_user() {
        let storage = setup_storage().await;
        assert!(storage.get_user_by_id_impl(99).await.unwrap().is_none());
        assert!(!storage.delete_user_impl(99).await.unwrap());
    }
}
