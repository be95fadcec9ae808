//! 反馈修改与删除的权限判定

use crate::models::ErrorCode;
use crate::models::feedbacks::entities::{FeedbackOwnership, FeedbackStatus};
use crate::models::feedbacks::requests::UpdateFeedbackRequest;
use crate::models::users::entities::{User, UserRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Denied {
    pub code: ErrorCode,
    pub message: &'static str,
}

const fn denied(code: ErrorCode, message: &'static str) -> Denied {
    Denied { code, message }
}

fn is_owner(user: &User, ownership: &FeedbackOwnership) -> bool {
    user.role == UserRole::TeachingAssistant && ownership.ta_user_id == user.id
}

fn is_supervisor(user: &User, ownership: &FeedbackOwnership) -> bool {
    user.role == UserRole::Supervisor && ownership.supervisor_id == user.id
}

/// 修改：
/// - 管理员不受限制
/// - 负责教师只能审核（status、remarks）
/// - 助教本人只能在待审核时修改内容
pub fn check_update(
    user: &User,
    ownership: &FeedbackOwnership,
    update: &UpdateFeedbackRequest,
) -> Result<(), Denied> {
    if user.role == UserRole::Admin {
        return Ok(());
    }

    if is_supervisor(user, ownership) {
        if update.content.is_some() {
            return Err(denied(
                ErrorCode::FeedbackPermissionDenied,
                "Supervisors can only review feedback",
            ));
        }
        return Ok(());
    }

    if is_owner(user, ownership) {
        if update.status.is_some() || update.remarks.is_some() {
            return Err(denied(
                ErrorCode::FeedbackPermissionDenied,
                "Teaching assistants cannot review their own feedback",
            ));
        }
        if ownership.feedback.status != FeedbackStatus::Pending {
            return Err(denied(
                ErrorCode::FeedbackNotEditable,
                "Reviewed feedback can no longer be edited",
            ));
        }
        return Ok(());
    }

    Err(denied(
        ErrorCode::FeedbackPermissionDenied,
        "You are not allowed to modify this feedback",
    ))
}

/// 删除：管理员，或助教本人删除待审核的反馈
pub fn check_delete(user: &User, ownership: &FeedbackOwnership) -> Result<(), Denied> {
    if user.role == UserRole::Admin {
        return Ok(());
    }
    if is_owner(user, ownership) {
        if ownership.feedback.status == FeedbackStatus::Pending {
            return Ok(());
        }
        return Err(denied(
            ErrorCode::FeedbackNotEditable,
            "Reviewed feedback can no longer be deleted",
        ));
    }
    Err(denied(
        ErrorCode::FeedbackPermissionDenied,
        "You are not allowed to delete this feedback",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::feedbacks::entities::Feedback;
    use crate::models::users::entities::UserStatus;
    use chrono::{NaiveDate, Utc};

    fn user(id: i64, role: UserRole) -> User {
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@example.edu"),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            display_name: None,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn ownership(status: FeedbackStatus) -> FeedbackOwnership {
        FeedbackOwnership {
            feedback: Feedback {
                id: 1,
                assignment_id: 1,
                date_submitted: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
                content: "weekly tutorials went fine".to_string(),
                status,
                remarks: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            ta_user_id: 10,
            supervisor_id: 20,
        }
    }

    fn review(status: FeedbackStatus) -> UpdateFeedbackRequest {
        UpdateFeedbackRequest {
            status: Some(status),
            remarks: Some("checked".to_string()),
            ..Default::default()
        }
    }

    fn edit() -> UpdateFeedbackRequest {
        UpdateFeedbackRequest {
            content: Some("revised".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_supervisor_reviews_but_cannot_edit() {
        let sup = user(20, UserRole::Supervisor);
        let own = ownership(FeedbackStatus::Pending);
        assert!(check_update(&sup, &own, &review(FeedbackStatus::Approved)).is_ok());
        let err = check_update(&sup, &own, &edit()).unwrap_err();
        assert_eq!(err.code, ErrorCode::FeedbackPermissionDenied);
    }

    #[test]
    fn test_other_supervisor_denied() {
        let other = user(21, UserRole::Supervisor);
        let own = ownership(FeedbackStatus::Pending);
        assert!(check_update(&other, &own, &review(FeedbackStatus::Rejected)).is_err());
    }

    #[test]
    fn test_owner_edits_only_while_pending() {
        let ta = user(10, UserRole::TeachingAssistant);
        assert!(check_update(&ta, &ownership(FeedbackStatus::Pending), &edit()).is_ok());

        let err = check_update(&ta, &ownership(FeedbackStatus::Approved), &edit()).unwrap_err();
        assert_eq!(err.code, ErrorCode::FeedbackNotEditable);

        let err = check_update(
            &ta,
            &ownership(FeedbackStatus::Pending),
            &review(FeedbackStatus::Approved),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::FeedbackPermissionDenied);
    }

    #[test]
    fn test_delete_rules() {
        let ta = user(10, UserRole::TeachingAssistant);
        let admin = user(1, UserRole::Admin);
        let stranger = user(11, UserRole::TeachingAssistant);

        assert!(check_delete(&ta, &ownership(FeedbackStatus::Pending)).is_ok());
        assert_eq!(
            check_delete(&ta, &ownership(FeedbackStatus::Rejected))
                .unwrap_err()
                .code,
            ErrorCode::FeedbackNotEditable
        );
        assert!(check_delete(&admin, &ownership(FeedbackStatus::Approved)).is_ok());
        assert!(check_delete(&stranger, &ownership(FeedbackStatus::Pending)).is_err());
    }
}
