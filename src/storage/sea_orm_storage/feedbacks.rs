//! 反馈存储操作

use std::collections::{HashMap, HashSet};

use super::{SeaOrmStorage, map_read_err, map_write_err};
use crate::entity::assignments::{
    Column as AssignmentColumn, Entity as Assignments, Relation as AssignmentRelation,
};
use crate::entity::courses::{Column as CourseColumn, Entity as Courses};
use crate::entity::feedbacks::{ActiveModel, Column, Entity as Feedbacks, Model, Relation};
use crate::entity::teaching_assistant_profiles::{
    Column as TaProfileColumn, Entity as TaProfiles,
};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{Result, TAFeedbackError};
use crate::models::{
    PaginationInfo, PaginationQuery,
    courses::entities::CourseBrief,
    feedbacks::{
        entities::{Feedback, FeedbackDetail, FeedbackOwnership, FeedbackPeriod, FeedbackStatus},
        requests::{FeedbackListQuery, UpdateFeedbackRequest},
        responses::FeedbackListResponse,
    },
    ta_profiles::entities::{Program, TeachingAssistantSummary},
};
use crate::utils::MonthWindow;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};

// 日期落在窗口内
fn within(window: &MonthWindow) -> Condition {
    Condition::all()
        .add(Column::DateSubmitted.gte(window.start))
        .add(Column::DateSubmitted.lt(window.end))
}

// 日期落在窗口外
fn outside(window: &MonthWindow) -> Condition {
    Condition::any()
        .add(Column::DateSubmitted.lt(window.start))
        .add(Column::DateSubmitted.gte(window.end))
}

impl SeaOrmStorage {
    /// 创建反馈，同一分配同一自然月只允许一条
    ///
    /// `(assignment_id, period)` 上的唯一索引兜住并发插入，冲突映射为 Conflict。
    pub async fn create_feedback_impl(
        &self,
        assignment_id: i64,
        content: String,
        date_submitted: NaiveDate,
    ) -> Result<Feedback> {
        let window = MonthWindow::containing(date_submitted);
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| map_write_err("开启事务失败", e))?;

        let existing = Feedbacks::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::Period.eq(window.period()))
            .count(&txn)
            .await
            .map_err(|e| map_read_err("查询本月反馈失败", e))?;

        if existing > 0 {
            return Err(TAFeedbackError::conflict(format!(
                "分配 {assignment_id} 在 {}-{:02} 已提交反馈",
                window.year(),
                window.month()
            )));
        }

        let model = ActiveModel {
            assignment_id: Set(assignment_id),
            date_submitted: Set(date_submitted),
            period: Set(window.period()),
            content: Set(content),
            status: Set(FeedbackStatus::Pending.to_string()),
            remarks: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| map_write_err("创建反馈失败", e))?;

        txn.commit()
            .await
            .map_err(|e| map_write_err("提交事务失败", e))?;

        Ok(result.into_feedback())
    }

    pub async fn get_feedback_by_id_impl(&self, feedback_id: i64) -> Result<Option<Feedback>> {
        let result = Feedbacks::find_by_id(feedback_id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_err("查询反馈失败", e))?;

        Ok(result.map(|m| m.into_feedback()))
    }

    /// 反馈及其所属助教用户、课程负责教师
    pub async fn get_feedback_ownership_impl(
        &self,
        feedback_id: i64,
    ) -> Result<Option<FeedbackOwnership>> {
        let Some((feedback, Some(assignment))) = Feedbacks::find_by_id(feedback_id)
            .find_also_related(Assignments)
            .one(&self.db)
            .await
            .map_err(|e| map_read_err("查询反馈失败", e))?
        else {
            return Ok(None);
        };

        let profile = TaProfiles::find_by_id(assignment.teaching_assistant_id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_err("查询助教档案失败", e))?;
        let course = Courses::find_by_id(assignment.course_id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_err("查询课程失败", e))?;

        Ok(match (profile, course) {
            (Some(profile), Some(course)) => Some(FeedbackOwnership {
                feedback: feedback.into_feedback(),
                ta_user_id: profile.user_id,
                supervisor_id: course.supervisor_id,
            }),
            _ => None,
        })
    }

    /// 分页列出反馈
    pub async fn list_feedbacks_with_pagination_impl(
        &self,
        query: FeedbackListQuery,
    ) -> Result<FeedbackListResponse> {
        let (page, size) = PaginationQuery::normalized(query.page, query.size);

        let mut select = Feedbacks::find();
        if let Some(assignment_id) = query.assignment_id {
            select = select.filter(Column::AssignmentId.eq(assignment_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let paginator = select
            .order_by_desc(Column::DateSubmitted)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| map_read_err("查询反馈总数失败", e))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| map_read_err("查询反馈页数失败", e))?;
        let feedbacks = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| map_read_err("查询反馈列表失败", e))?;

        Ok(FeedbackListResponse {
            items: feedbacks.into_iter().map(|m| m.into_feedback()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_feedback_impl(
        &self,
        feedback_id: i64,
        update: UpdateFeedbackRequest,
    ) -> Result<Option<Feedback>> {
        if self.get_feedback_by_id_impl(feedback_id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(feedback_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(content) = update.content {
            model.content = Set(content);
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(remarks) = update.remarks {
            model.remarks = Set(Some(remarks));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| map_write_err("更新反馈失败", e))?;

        Ok(Some(updated.into_feedback()))
    }

    pub async fn delete_feedback_impl(&self, feedback_id: i64) -> Result<bool> {
        let result = Feedbacks::delete_by_id(feedback_id)
            .exec(&self.db)
            .await
            .map_err(|e| map_write_err("删除反馈失败", e))?;

        Ok(result.rows_affected > 0)
    }

    /// 助教本人的反馈：`Current` 为窗口内，`Past` 为窗口外
    pub async fn list_ta_feedbacks_impl(
        &self,
        user_id: i64,
        window: MonthWindow,
        period: FeedbackPeriod,
    ) -> Result<Vec<FeedbackDetail>> {
        let period_condition = match period {
            FeedbackPeriod::Current => within(&window),
            FeedbackPeriod::Past => outside(&window),
        };

        let feedbacks = Feedbacks::find()
            .join(JoinType::InnerJoin, Relation::Assignment.def())
            .join(JoinType::InnerJoin, AssignmentRelation::TeachingAssistant.def())
            .filter(TaProfileColumn::UserId.eq(user_id))
            .filter(period_condition)
            .order_by_desc(Column::DateSubmitted)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| map_read_err("查询助教反馈失败", e))?;

        self.attach_feedback_details(feedbacks).await
    }

    /// 负责教师名下、窗口内、待审核的反馈
    pub async fn list_pending_feedbacks_for_supervisor_impl(
        &self,
        user_id: i64,
        window: MonthWindow,
    ) -> Result<Vec<FeedbackDetail>> {
        let feedbacks = Feedbacks::find()
            .join(JoinType::InnerJoin, Relation::Assignment.def())
            .join(JoinType::InnerJoin, AssignmentRelation::Course.def())
            .filter(CourseColumn::SupervisorId.eq(user_id))
            .filter(Column::Status.eq(FeedbackStatus::Pending.to_string()))
            .filter(within(&window))
            .order_by_asc(Column::DateSubmitted)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| map_read_err("查询待审核反馈失败", e))?;

        self.attach_feedback_details(feedbacks).await
    }

    /// 批量补全课程与助教信息，保持输入顺序
    async fn attach_feedback_details(&self, feedbacks: Vec<Model>) -> Result<Vec<FeedbackDetail>> {
        if feedbacks.is_empty() {
            return Ok(Vec::new());
        }

        let assignment_ids: HashSet<i64> = feedbacks.iter().map(|f| f.assignment_id).collect();
        let assignments = Assignments::find()
            .filter(AssignmentColumn::Id.is_in(assignment_ids))
            .all(&self.db)
            .await
            .map_err(|e| map_read_err("查询分配失败", e))?;

        let course_ids: HashSet<i64> = assignments.iter().map(|a| a.course_id).collect();
        let profile_ids: HashSet<i64> = assignments
            .iter()
            .map(|a| a.teaching_assistant_id)
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

        let profiles = TaProfiles::find()
            .filter(TaProfileColumn::Id.is_in(profile_ids))
            .all(&self.db)
            .await
            .map_err(|e| map_read_err("查询助教档案失败", e))?;

        let user_ids: HashSet<i64> = profiles.iter().map(|p| p.user_id).collect();
        let user_map: HashMap<i64, (String, Option<String>)> = Users::find()
            .filter(UserColumn::Id.is_in(user_ids))
            .all(&self.db)
            .await
            .map_err(|e| map_read_err("查询用户失败", e))?
            .into_iter()
            .map(|u| (u.id, (u.username, u.display_name)))
            .collect();

        let ta_map: HashMap<i64, TeachingAssistantSummary> = profiles
            .into_iter()
            .filter_map(|p| {
                let (username, display_name) = user_map.get(&p.user_id)?.clone();
                Some((
                    p.id,
                    TeachingAssistantSummary {
                        id: p.id,
                        user_id: p.user_id,
                        username,
                        display_name,
                        program: Program::from_code(p.program)?,
                    },
                ))
            })
            .collect();

        // assignment_id -> (course_id, profile_id)
        let assignment_map: HashMap<i64, (i64, i64)> = assignments
            .into_iter()
            .map(|a| (a.id, (a.course_id, a.teaching_assistant_id)))
            .collect();

        Ok(feedbacks
            .into_iter()
            .map(|f| {
                let link = assignment_map.get(&f.assignment_id).copied();
                FeedbackDetail {
                    course: link.and_then(|(course_id, _)| course_map.get(&course_id).cloned()),
                    teaching_assistant: link
                        .and_then(|(_, profile_id)| ta_map.get(&profile_id).cloned()),
                    feedback: f.into_feedback(),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::{assign, create_course, create_ta, create_user, setup_storage};
    use crate::models::feedbacks::{
        entities::{FeedbackPeriod, FeedbackStatus},
        requests::{FeedbackListQuery, UpdateFeedbackRequest},
    };
    use crate::models::ta_profiles::entities::Program;
    use crate::models::users::entities::UserRole;
    use crate::utils::MonthWindow;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_second_feedback_in_same_month_conflicts() {
        let storage = setup_storage().await;
        let sup = create_user(&storage, "sup_m", UserRole::Supervisor).await;
        let course = create_course(&storage, "CS610", sup.id).await;
        let (_, ta) = create_ta(&storage, "ta_m", Program::MTech).await;
        let a = assign(&storage, course.id, ta.id).await;

        storage
            .create_feedback_impl(a.id, "first".to_string(), day(2024, 2, 1))
            .await
            .unwrap();
        let err = storage
            .create_feedback_impl(a.id, "second".to_string(), day(2024, 2, 29))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E008");

        // 下个月以及另一年的同月都允许
        storage
            .create_feedback_impl(a.id, "march".to_string(), day(2024, 3, 1))
            .await
            .unwrap();
        storage
            .create_feedback_impl(a.id, "next feb".to_string(), day(2025, 2, 10))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_creates_in_same_month_yield_one_conflict() {
        let storage = setup_storage().await;
        let sup = create_user(&storage, "sup_r", UserRole::Supervisor).await;
        let course = create_course(&storage, "CS611", sup.id).await;
        let (_, ta) = create_ta(&storage, "ta_r", Program::MTech).await;
        let a = assign(&storage, course.id, ta.id).await;

        let (first, second) = tokio::join!(
            storage.create_feedback_impl(a.id, "one".to_string(), day(2024, 4, 3)),
            storage.create_feedback_impl(a.id, "two".to_string(), day(2024, 4, 27)),
        );
        let results = [first, second];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let err = results.into_iter().find_map(|r| r.err()).unwrap();
        assert_eq!(err.code(), "E008");
    }

    #[tokio::test]
    async fn test_unique_period_index_rejects_duplicate_insert() {
        use super::{ActiveModel, map_write_err};
        use sea_orm::{ActiveModelTrait, Set};

        let storage = setup_storage().await;
        let sup = create_user(&storage, "sup_i", UserRole::Supervisor).await;
        let course = create_course(&storage, "CS612", sup.id).await;
        let (_, ta) = create_ta(&storage, "ta_i", Program::PhdVss).await;
        let a = assign(&storage, course.id, ta.id).await;

        let created = storage
            .create_feedback_impl(a.id, "first".to_string(), day(2024, 7, 1))
            .await
            .unwrap();
        assert_eq!(MonthWindow::containing(created.date_submitted).period(), 202407);

        // 绕过应用层检查，直接插入同月记录
        let err = ActiveModel {
            assignment_id: Set(a.id),
            date_submitted: Set(day(2024, 7, 20)),
            period: Set(202407),
            content: Set("raw".to_string()),
            status: Set(FeedbackStatus::Pending.to_string()),
            remarks: Set(None),
            created_at: Set(0),
            updated_at: Set(0),
            ..Default::default()
        }
        .insert(&storage.db)
        .await
        .unwrap_err();
        assert_eq!(map_write_err("insert", err).code(), "E008");
    }

    #[tokio::test]
    async fn test_current_and_past_partition_ta_feedback() {
        let storage = setup_storage().await;
        let sup = create_user(&storage, "sup_c", UserRole::Supervisor).await;
        let course = create_course(&storage, "CS620", sup.id).await;
        let (ta_user, ta) = create_ta(&storage, "ta_c", Program::PhdMhrd).await;
        let (other_user, other_ta) = create_ta(&storage, "ta_o", Program::PhdMhrd).await;
        let a = assign(&storage, course.id, ta.id).await;
        let other = assign(&storage, course.id, other_ta.id).await;

        let current = storage
            .create_feedback_impl(a.id, "now".to_string(), day(2024, 6, 12))
            .await
            .unwrap();
        let earlier = storage
            .create_feedback_impl(a.id, "earlier".to_string(), day(2024, 5, 2))
            .await
            .unwrap();
        // 去年同月不属于本月
        let last_year = storage
            .create_feedback_impl(a.id, "last year".to_string(), day(2023, 6, 20))
            .await
            .unwrap();
        storage
            .create_feedback_impl(other.id, "not mine".to_string(), day(2024, 6, 1))
            .await
            .unwrap();

        let window = MonthWindow::new(2024, 6).unwrap();
        let now = storage
            .list_ta_feedbacks_impl(ta_user.id, window, FeedbackPeriod::Current)
            .await
            .unwrap();
        assert_eq!(now.len(), 1);
        assert_eq!(now[0].feedback.id, current.id);
        assert_eq!(now[0].course.as_ref().unwrap().code, "CS620");
        let ta_summary = now[0].teaching_assistant.as_ref().unwrap();
        assert_eq!(ta_summary.user_id, ta_user.id);
        assert_eq!(ta_summary.program, Program::PhdMhrd);

        let past = storage
            .list_ta_feedbacks_impl(ta_user.id, window, FeedbackPeriod::Past)
            .await
            .unwrap();
        let past_ids: Vec<i64> = past.iter().map(|d| d.feedback.id).collect();
        assert_eq!(past_ids, vec![earlier.id, last_year.id]);

        let others = storage
            .list_ta_feedbacks_impl(other_user.id, window, FeedbackPeriod::Current)
            .await
            .unwrap();
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].feedback.content, "not mine");
    }

    #[tokio::test]
    async fn test_approval_current_only_pending_under_supervisor() {
        let storage = setup_storage().await;
        let sup = create_user(&storage, "sup_u", UserRole::Supervisor).await;
        let other_sup = create_user(&storage, "sup_v", UserRole::Supervisor).await;
        let mine = create_course(&storage, "CS630", sup.id).await;
        let theirs = create_course(&storage, "CS631", other_sup.id).await;
        let mine2 = create_course(&storage, "CS632", sup.id).await;
        let (_, ta) = create_ta(&storage, "ta_u", Program::PhdVss).await;
        let a_mine = assign(&storage, mine.id, ta.id).await;
        let a_theirs = assign(&storage, theirs.id, ta.id).await;
        let a_mine2 = assign(&storage, mine2.id, ta.id).await;

        let pending = storage
            .create_feedback_impl(a_mine.id, "pending".to_string(), day(2024, 9, 5))
            .await
            .unwrap();
        storage
            .create_feedback_impl(a_theirs.id, "other course".to_string(), day(2024, 9, 5))
            .await
            .unwrap();
        let approved = storage
            .create_feedback_impl(a_mine2.id, "approved".to_string(), day(2024, 9, 6))
            .await
            .unwrap();
        storage
            .update_feedback_impl(
                approved.id,
                UpdateFeedbackRequest {
                    status: Some(FeedbackStatus::Approved),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        storage
            .create_feedback_impl(a_mine.id, "old".to_string(), day(2024, 8, 30))
            .await
            .unwrap();

        let result = storage
            .list_pending_feedbacks_for_supervisor_impl(sup.id, MonthWindow::new(2024, 9).unwrap())
            .await
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].feedback.id, pending.id);
        assert_eq!(result[0].feedback.status, FeedbackStatus::Pending);
    }

    #[tokio::test]
    async fn test_ownership_update_and_cascade() {
        let storage = setup_storage().await;
        let sup = create_user(&storage, "sup_w", UserRole::Supervisor).await;
        let course = create_course(&storage, "CS640", sup.id).await;
        let (ta_user, ta) = create_ta(&storage, "ta_w", Program::MTech).await;
        let a = assign(&storage, course.id, ta.id).await;
        let feedback = storage
            .create_feedback_impl(a.id, "draft".to_string(), day(2024, 1, 15))
            .await
            .unwrap();

        let ownership = storage
            .get_feedback_ownership_impl(feedback.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ownership.ta_user_id, ta_user.id);
        assert_eq!(ownership.supervisor_id, sup.id);

        let updated = storage
            .update_feedback_impl(
                feedback.id,
                UpdateFeedbackRequest {
                    status: Some(FeedbackStatus::Rejected),
                    remarks: Some("needs detail".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, FeedbackStatus::Rejected);
        assert_eq!(updated.remarks.as_deref(), Some("needs detail"));
        assert_eq!(updated.content, "draft");

        let rejected = storage
            .list_feedbacks_with_pagination_impl(FeedbackListQuery {
                status: Some(FeedbackStatus::Rejected),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(rejected.pagination.total, 1);

        // 删除分配后反馈随之删除
        assert!(storage.delete_assignment_impl(a.id).await.unwrap());
        assert!(storage.get_feedback_by_id_impl(feedback.id).await.unwrap().is_none());
    }
}
