//! 报表统计

use super::{SeaOrmStorage, map_read_err};
use crate::entity::assignments::Relation as AssignmentRelation;
use crate::entity::feedbacks::{Column, Entity as Feedbacks, Relation};
use crate::entity::teaching_assistant_profiles::Column as TaProfileColumn;
use crate::errors::Result;
use crate::models::{
    feedbacks::entities::FeedbackStatus, reports::entities::FeedbackCountRow,
    ta_profiles::entities::Program,
};
use crate::utils::MonthWindow;
use sea_orm::{
    ColumnTrait, EntityTrait, JoinType, QueryFilter, QuerySelect, RelationTrait,
};
use tracing::warn;

impl SeaOrmStorage {
    /// 统计窗口内的反馈数量，按 (培养项目, 状态) 分组
    pub async fn count_feedbacks_by_program_and_status_impl(
        &self,
        window: MonthWindow,
    ) -> Result<Vec<FeedbackCountRow>> {
        let rows = Feedbacks::find()
            .select_only()
            .column(TaProfileColumn::Program)
            .column(Column::Status)
            .column_as(Column::Id.count(), "count")
            .join(JoinType::InnerJoin, Relation::Assignment.def())
            .join(JoinType::InnerJoin, AssignmentRelation::TeachingAssistant.def())
            .filter(Column::DateSubmitted.gte(window.start))
            .filter(Column::DateSubmitted.lt(window.end))
            .group_by(TaProfileColumn::Program)
            .group_by(Column::Status)
            .into_tuple::<(i32, String, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| map_read_err("统计反馈数量失败", e))?;

        Ok(rows
            .into_iter()
            .filter_map(|(program, status, count)| {
                let parsed = Program::from_code(program)
                    .zip(status.parse::<FeedbackStatus>().ok());
                if parsed.is_none() {
                    warn!(
                        "Skipping feedback count row with unknown program {} or status '{}'",
                        program, status
                    );
                }
                parsed.map(|(program, status)| FeedbackCountRow {
                    program,
                    status,
                    count: count.max(0) as u64,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::{assign, create_course, create_ta, create_user, setup_storage};
    use crate::models::feedbacks::{entities::FeedbackStatus, requests::UpdateFeedbackRequest};
    use crate::models::ta_profiles::entities::Program;
    use crate::models::users::entities::UserRole;
    use crate::utils::MonthWindow;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_counts_partition_by_program_and_status() {
        let storage = setup_storage().await;
        let sup = create_user(&storage, "sup_r", UserRole::Supervisor).await;
        let c1 = create_course(&storage, "CS650", sup.id).await;
        let c2 = create_course(&storage, "CS651", sup.id).await;
        let (_, mtech) = create_ta(&storage, "ta_mt", Program::MTech).await;
        let (_, vss) = create_ta(&storage, "ta_vss", Program::PhdVss).await;

        let a1 = assign(&storage, c1.id, mtech.id).await;
        let a2 = assign(&storage, c2.id, mtech.id).await;
        let a3 = assign(&storage, c1.id, vss.id).await;

        let f1 = storage
            .create_feedback_impl(a1.id, "a".to_string(), day(2023, 3, 2))
            .await
            .unwrap();
        storage
            .create_feedback_impl(a2.id, "b".to_string(), day(2023, 3, 31))
            .await
            .unwrap();
        let f3 = storage
            .create_feedback_impl(a3.id, "c".to_string(), day(2023, 3, 15))
            .await
            .unwrap();
        // 其他月份与其他年份同月不计入
        storage
            .create_feedback_impl(a1.id, "d".to_string(), day(2023, 4, 1))
            .await
            .unwrap();
        storage
            .create_feedback_impl(a3.id, "e".to_string(), day(2024, 3, 1))
            .await
            .unwrap();

        for (id, status) in [
            (f1.id, FeedbackStatus::Approved),
            (f3.id, FeedbackStatus::Rejected),
        ] {
            storage
                .update_feedback_impl(
                    id,
                    UpdateFeedbackRequest {
                        status: Some(status),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
        }

        let rows = storage
            .count_feedbacks_by_program_and_status_impl(MonthWindow::new(2023, 3).unwrap())
            .await
            .unwrap();

        let count_of = |program: Program, status: FeedbackStatus| {
            rows.iter()
                .find(|r| r.program == program && r.status == status)
                .map(|r| r.count)
                .unwrap_or(0)
        };
        assert_eq!(count_of(Program::MTech, FeedbackStatus::Approved), 1);
        assert_eq!(count_of(Program::MTech, FeedbackStatus::Pending), 1);
        assert_eq!(count_of(Program::PhdVss, FeedbackStatus::Rejected), 1);
        assert_eq!(count_of(Program::PhdMhrd, FeedbackStatus::Pending), 0);

        let total: u64 = rows.iter().map(|r| r.count).sum();
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn test_empty_month_has_no_rows() {
        let storage = setup_storage().await;
        let rows = storage
            .count_feedbacks_by_program_and_status_impl(MonthWindow::new(2023, 3).unwrap())
            .await
            .unwrap();
        assert!(rows.is_empty());
    }
}
