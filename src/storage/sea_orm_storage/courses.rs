//! 课程存储操作

use super::{SeaOrmStorage, map_read_err, map_write_err};
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::errors::Result;
use crate::models::{
    PaginationInfo, PaginationQuery,
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建课程
    pub async fn create_course_impl(&self, req: CreateCourseRequest) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            code: Set(req.code),
            name: Set(req.name),
            supervisor_id: Set(req.supervisor_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err("创建课程失败", e))?;

        Ok(result.into_course())
    }

    /// 通过 ID 获取课程
    pub async fn get_course_by_id_impl(&self, course_id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_err("查询课程失败", e))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 分页列出课程
    pub async fn list_courses_with_pagination_impl(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        let (page, size) = PaginationQuery::normalized(query.page, query.size);

        let mut select = Courses::find();

        // 负责教师筛选（current 视图）
        if let Some(supervisor_id) = query.supervisor_id {
            select = select.filter(Column::SupervisorId.eq(supervisor_id));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Code.contains(&escaped))
                    .add(Column::Name.contains(&escaped)),
            );
        }

        let paginator = select.order_by_asc(Column::Code).paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| map_read_err("查询课程总数失败", e))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| map_read_err("查询课程页数失败", e))?;
        let courses = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| map_read_err("查询课程列表失败", e))?;

        Ok(CourseListResponse {
            items: courses.into_iter().map(|m| m.into_course()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新课程信息
    pub async fn update_course_impl(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        if self.get_course_by_id_impl(course_id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(course_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(code) = update.code {
            model.code = Set(code);
        }
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(supervisor_id) = update.supervisor_id {
            model.supervisor_id = Set(supervisor_id);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| map_write_err("更新课程失败", e))?;

        Ok(Some(updated.into_course()))
    }

    /// 删除课程
    pub async fn delete_course_impl(&self, course_id: i64) -> Result<bool> {
        let result = Courses::delete_by_id(course_id)
            .exec(&self.db)
            .await
            .map_err(|e| map_write_err("删除课程失败", e))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::{create_course, create_user, setup_storage};
    use crate::models::courses::requests::{CourseListQuery, UpdateCourseRequest};
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_current_courses_filtered_by_supervisor() {
        let storage = setup_storage().await;
        let sup_a = create_user(&storage, "sup_a", UserRole::Supervisor).await;
        let sup_b = create_user(&storage, "sup_b", UserRole::Supervisor).await;
        create_course(&storage, "CS601", sup_a.id).await;
        create_course(&storage, "CS602", sup_a.id).await;
        create_course(&storage, "EE210", sup_b.id).await;

        let all = storage
            .list_courses_with_pagination_impl(CourseListQuery::default())
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 3);

        let current = storage
            .list_courses_with_pagination_impl(CourseListQuery {
                supervisor_id: Some(sup_a.id),
                ..Default::default()
            })
            .await
            .unwrap();
        let codes: Vec<_> = current.items.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["CS601", "CS602"]);
    }

    #[tokio::test]
    async fn test_search_escapes_wildcards() {
        let storage = setup_storage().await;
        let sup = create_user(&storage, "sup_s", UserRole::Supervisor).await;
        create_course(&storage, "CS601", sup.id).await;

        let found = storage
            .list_courses_with_pagination_impl(CourseListQuery {
                search: Some("%".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(found.items.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_code_and_unknown_supervisor() {
        let storage = setup_storage().await;
        let sup = create_user(&storage, "sup_d", UserRole::Supervisor).await;
        create_course(&storage, "MA101", sup.id).await;

        let dup = storage
            .create_course_impl(crate::models::courses::requests::CreateCourseRequest {
                code: "MA101".to_string(),
                name: "again".to_string(),
                supervisor_id: sup.id,
            })
            .await
            .unwrap_err();
        assert_eq!(dup.code(), "E008");

        let orphan = storage
            .create_course_impl(crate::models::courses::requests::CreateCourseRequest {
                code: "MA102".to_string(),
                name: "orphan".to_string(),
                supervisor_id: 9999,
            })
            .await
            .unwrap_err();
        assert_eq!(orphan.code(), "E006");
    }

    #[tokio::test]
    async fn test_update_and_delete_course() {
        let storage = setup_storage().await;
        let sup = create_user(&storage, "sup_u", UserRole::Supervisor).await;
        let course = create_course(&storage, "PH100", sup.id).await;

        let updated = storage
            .update_course_impl(
                course.id,
                UpdateCourseRequest {
                    code: None,
                    name: Some("Physics I".to_string()),
                    supervisor_id: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Physics I");
        assert_eq!(updated.code, "PH100");

        assert!(storage.delete_course_impl(course.id).await.unwrap());
        assert!(storage.get_course_by_id_impl(course.id).await.unwrap().is_none());
    }
}
