//! 助教档案存储操作

use super::{SeaOrmStorage, map_read_err, map_write_err};
use crate::entity::teaching_assistant_profiles::{ActiveModel, Column, Entity as TaProfiles};
use crate::entity::users::Entity as Users;
use crate::errors::Result;
use crate::models::{
    PaginationInfo, PaginationQuery,
    assignments::entities::TaAssignView,
    ta_profiles::{
        entities::{Program, TeachingAssistantProfile},
        requests::{CreateTaProfileRequest, TaProfileListQuery, UpdateTaProfileRequest},
        responses::TaProfileListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建助教档案
    pub async fn create_ta_profile_impl(
        &self,
        req: CreateTaProfileRequest,
    ) -> Result<TeachingAssistantProfile> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            user_id: Set(req.user_id),
            program: Set(req.program.code()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err("创建助教档案失败", e))?;

        Ok(result.into_ta_profile())
    }

    pub async fn get_ta_profile_by_id_impl(
        &self,
        profile_id: i64,
    ) -> Result<Option<TeachingAssistantProfile>> {
        let result = TaProfiles::find_by_id(profile_id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_err("查询助教档案失败", e))?;

        Ok(result.map(|m| m.into_ta_profile()))
    }

    /// 通过用户 ID 获取助教档案
    pub async fn get_ta_profile_by_user_id_impl(
        &self,
        user_id: i64,
    ) -> Result<Option<TeachingAssistantProfile>> {
        let result = TaProfiles::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| map_read_err("查询助教档案失败", e))?;

        Ok(result.map(|m| m.into_ta_profile()))
    }

    /// 分页列出助教档案
    pub async fn list_ta_profiles_with_pagination_impl(
        &self,
        query: TaProfileListQuery,
    ) -> Result<TaProfileListResponse> {
        let (page, size) = PaginationQuery::normalized(query.page, query.size);

        let mut select = TaProfiles::find();
        if let Some(program) = query.program {
            select = select.filter(Column::Program.eq(program.code()));
        }

        let paginator = select.order_by_asc(Column::Id).paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| map_read_err("查询助教档案总数失败", e))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| map_read_err("查询助教档案页数失败", e))?;
        let profiles = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| map_read_err("查询助教档案列表失败", e))?;

        Ok(TaProfileListResponse {
            items: profiles.into_iter().map(|m| m.into_ta_profile()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_ta_profile_impl(
        &self,
        profile_id: i64,
        update: UpdateTaProfileRequest,
    ) -> Result<Option<TeachingAssistantProfile>> {
        let Some(existing) = self.get_ta_profile_by_id_impl(profile_id).await? else {
            return Ok(None);
        };

        let Some(program) = update.program else {
            return Ok(Some(existing));
        };

        let model = ActiveModel {
            id: Set(profile_id),
            program: Set(program.code()),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| map_write_err("更新助教档案失败", e))?;

        Ok(Some(updated.into_ta_profile()))
    }

    /// 删除助教档案（级联删除分配与反馈）
    pub async fn delete_ta_profile_impl(&self, profile_id: i64) -> Result<bool> {
        let result = TaProfiles::delete_by_id(profile_id)
            .exec(&self.db)
            .await
            .map_err(|e| map_write_err("删除助教档案失败", e))?;

        Ok(result.rows_affected > 0)
    }

    /// 全部助教及其用户信息，按档案 ID 排序
    pub async fn list_ta_assign_views_impl(&self) -> Result<Vec<TaAssignView>> {
        let rows = TaProfiles::find()
            .find_also_related(Users)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| map_read_err("查询助教列表失败", e))?;

        Ok(rows
            .into_iter()
            .filter_map(|(profile, user)| {
                let user = user?;
                Some(TaAssignView {
                    id: profile.id,
                    user_id: profile.user_id,
                    username: user.username,
                    display_name: user.display_name,
                    program: Program::from_code(profile.program)?,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::{create_ta, create_user, setup_storage};
    use crate::models::ta_profiles::{
        entities::Program,
        requests::{CreateTaProfileRequest, TaProfileListQuery, UpdateTaProfileRequest},
    };
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_assign_view_lists_every_profile() {
        let storage = setup_storage().await;
        let (u1, p1) = create_ta(&storage, "ta_one", Program::MTech).await;
        let (_, p2) = create_ta(&storage, "ta_two", Program::PhdVss).await;

        let views = storage.list_ta_assign_views_impl().await.unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].id, p1.id);
        assert_eq!(views[0].user_id, u1.id);
        assert_eq!(views[0].username, "ta_one");
        assert_eq!(views[0].display_name.as_deref(), Some("TA_ONE"));
        assert_eq!(views[1].id, p2.id);
        assert_eq!(views[1].program, Program::PhdVss);
    }

    #[tokio::test]
    async fn test_one_profile_per_user() {
        let storage = setup_storage().await;
        let (user, _) = create_ta(&storage, "ta_dup", Program::MTech).await;

        let err = storage
            .create_ta_profile_impl(CreateTaProfileRequest {
                user_id: user.id,
                program: Program::PhdMhrd,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E008");
    }

    #[tokio::test]
    async fn test_filter_and_update_program() {
        let storage = setup_storage().await;
        let (_, p1) = create_ta(&storage, "ta_a", Program::MTech).await;
        create_ta(&storage, "ta_b", Program::PhdMhrd).await;
        create_user(&storage, "not_ta", UserRole::Supervisor).await;

        let mtech = storage
            .list_ta_profiles_with_pagination_impl(TaProfileListQuery {
                program: Some(Program::MTech),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(mtech.items.len(), 1);
        assert_eq!(mtech.items[0].id, p1.id);

        let updated = storage
            .update_ta_profile_impl(
                p1.id,
                UpdateTaProfileRequest {
                    program: Some(Program::PhdVss),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.program, Program::PhdVss);

        let by_user = storage
            .get_ta_profile_by_user_id_impl(p1.user_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_user.program, Program::PhdVss);
    }
}
