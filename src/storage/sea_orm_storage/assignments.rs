//! 助教分配存储操作

use std::collections::{HashMap, HashSet};

use super::{SeaOrmStorage, map_read_err, map_write_err};
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::courses::{Column as CourseColumn, Entity as Courses};
use crate::entity::feedbacks::{Column as FeedbackColumn, Entity as Feedbacks};
use crate::errors::Result;
use crate::models::{
    PaginationInfo, PaginationQuery,
    assignments::{
        entities::{Assignment, SubmittableAssignment},
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListResponse,
    },
    courses::entities::CourseBrief,
};
use crate::utils::MonthWindow;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建分配
    pub async fn create_assignment_impl(&self, req: CreateAssignmentRequest) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(req.course_id),
            teaching_assistant_id: Set(req.teaching_assistant_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err("创建分配失败", e))?;

        Ok(result.into_assignment())
    }

    pub async fn get_assignment_by_id_impl(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_err("查询分配失败", e))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 分页列出分配
    pub async fn list_assignments_with_pagination_impl(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        let (page, size) = PaginationQuery::normalized(query.page, query.size);

        let mut select = Assignments::find();
        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }
        if let Some(ta_id) = query.teaching_assistant_id {
            select = select.filter(Column::TeachingAssistantId.eq(ta_id));
        }

        let paginator = select.order_by_asc(Column::Id).paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| map_read_err("查询分配总数失败", e))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| map_read_err("查询分配页数失败", e))?;
        let assignments = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| map_read_err("查询分配列表失败", e))?;

        Ok(AssignmentListResponse {
            items: assignments
                .into_iter()
                .map(|m| m.into_assignment())
                .collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_assignment_impl(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        if self.get_assignment_by_id_impl(assignment_id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(assignment_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(course_id) = update.course_id {
            model.course_id = Set(course_id);
        }
        if let Some(ta_id) = update.teaching_assistant_id {
            model.teaching_assistant_id = Set(ta_id);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| map_write_err("更新分配失败", e))?;

        Ok(Some(updated.into_assignment()))
    }

    /// 删除分配（级联删除反馈）
    pub async fn delete_assignment_impl(&self, assignment_id: i64) -> Result<bool> {
        let result = Assignments::delete_by_id(assignment_id)
            .exec(&self.db)
            .await
            .map_err(|e| map_write_err("删除分配失败", e))?;

        Ok(result.rows_affected > 0)
    }

    /// 助教在 `window` 月份内尚未提交反馈的分配
    pub async fn list_submittable_assignments_impl(
        &self,
        user_id: i64,
        window: MonthWindow,
    ) -> Result<Vec<SubmittableAssignment>> {
        let Some(profile) = self.get_ta_profile_by_user_id_impl(user_id).await? else {
            return Ok(Vec::new());
        };

        let assignments = Assignments::find()
            .filter(Column::TeachingAssistantId.eq(profile.id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| map_read_err("查询助教分配失败", e))?;

        if assignments.is_empty() {
            return Ok(Vec::new());
        }

        let assignment_ids: Vec<i64> = assignments.iter().map(|a| a.id).collect();

        // 本月已提交过反馈的分配
        let submitted: HashSet<i64> = Feedbacks::find()
            .select_only()
            .column(FeedbackColumn::AssignmentId)
            .filter(FeedbackColumn::AssignmentId.is_in(assignment_ids))
            .filter(FeedbackColumn::DateSubmitted.gte(window.start))
            .filter(FeedbackColumn::DateSubmitted.lt(window.end))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| map_read_err("查询本月反馈失败", e))?
            .into_iter()
            .collect();

        let pending: Vec<_> = assignments
            .into_iter()
            .filter(|a| !submitted.contains(&a.id))
            .collect();

        let course_ids: Vec<i64> = pending
            .iter()
            .map(|a| a.course_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let course_map: HashMap<i64, CourseBrief> = Courses::find()
            .filter(CourseColumn::Id.is_in(course_ids))
            .all(&self.db)
            .await
            .map_err(|e| map_read_err("查询课程失败", e))?
            .into_iter()
            .map(|c| {
                (
                    c.id,
                    CourseBrief {
                        id: c.id,
                        code: c.code,
                        name: c.name,
                    },
                )
            })
            .collect();

        Ok(pending
            .into_iter()
            .filter_map(|a| {
                Some(SubmittableAssignment {
                    id: a.id,
                    teaching_assistant_id: a.teaching_assistant_id,
                    course: course_map.get(&a.course_id)?.clone(),
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::{assign, create_course, create_ta, create_user, setup_storage};
    use crate::models::assignments::requests::{AssignmentListQuery, CreateAssignmentRequest};
    use crate::models::ta_profiles::entities::Program;
    use crate::models::users::entities::UserRole;
    use crate::utils::MonthWindow;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_submit_excludes_exactly_current_month_feedback() {
        let storage = setup_storage().await;
        let sup = create_user(&storage, "sup_x", UserRole::Supervisor).await;
        let c1 = create_course(&storage, "CS601", sup.id).await;
        let c2 = create_course(&storage, "CS602", sup.id).await;
        let c3 = create_course(&storage, "CS603", sup.id).await;
        let (ta_user, ta) = create_ta(&storage, "ta_x", Program::MTech).await;
        let (_, other_ta) = create_ta(&storage, "ta_y", Program::MTech).await;

        let a1 = assign(&storage, c1.id, ta.id).await;
        let a2 = assign(&storage, c2.id, ta.id).await;
        let a3 = assign(&storage, c3.id, ta.id).await;
        assign(&storage, c1.id, other_ta.id).await;

        let window = MonthWindow::new(2024, 5).unwrap();
        // a1 本月已提交；a2 只在上月与去年同月提交过
        storage
            .create_feedback_impl(a1.id, "May".to_string(), day(2024, 5, 3))
            .await
            .unwrap();
        storage
            .create_feedback_impl(a2.id, "April".to_string(), day(2024, 4, 28))
            .await
            .unwrap();
        storage
            .create_feedback_impl(a2.id, "Last May".to_string(), day(2023, 5, 10))
            .await
            .unwrap();

        let submittable = storage
            .list_submittable_assignments_impl(ta_user.id, window)
            .await
            .unwrap();
        let ids: Vec<i64> = submittable.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![a2.id, a3.id]);
        assert_eq!(submittable[0].course.code, "CS602");
        assert_eq!(submittable[1].course.code, "CS603");
    }

    #[tokio::test]
    async fn test_submit_for_user_without_profile_is_empty() {
        let storage = setup_storage().await;
        let sup = create_user(&storage, "sup_z", UserRole::Supervisor).await;
        let result = storage
            .list_submittable_assignments_impl(sup.id, MonthWindow::new(2024, 1).unwrap())
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_unique_course_ta_pair_and_filters() {
        let storage = setup_storage().await;
        let sup = create_user(&storage, "sup_p", UserRole::Supervisor).await;
        let course = create_course(&storage, "EE210", sup.id).await;
        let (_, ta) = create_ta(&storage, "ta_p", Program::PhdMhrd).await;
        assign(&storage, course.id, ta.id).await;

        let err = storage
            .create_assignment_impl(CreateAssignmentRequest {
                course_id: course.id,
                teaching_assistant_id: ta.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E008");

        let listed = storage
            .list_assignments_with_pagination_impl(AssignmentListQuery {
                course_id: Some(course.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(listed.items.len(), 1);

        let none = storage
            .list_assignments_with_pagination_impl(AssignmentListQuery {
                teaching_assistant_id: Some(ta.id + 100),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(none.items.is_empty());
    }
}
