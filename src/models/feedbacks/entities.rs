use serde::{Deserialize, Serialize};

use crate::models::courses::entities::CourseBrief;
use crate::models::ta_profiles::entities::TeachingAssistantSummary;

// 反馈审核状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackStatus {
    Pending,  // 待审核
    Approved, // 已通过
    Rejected, // 已驳回
}

impl FeedbackStatus {
    pub const PENDING: &'static str = "pending";
    pub const APPROVED: &'static str = "approved";
    pub const REJECTED: &'static str = "rejected";
}

impl<'de> Deserialize<'de> for FeedbackStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<FeedbackStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的反馈状态: '{s}'. 支持的状态: pending, approved, rejected"
            ))
        })
    }
}

impl std::fmt::Display for FeedbackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedbackStatus::Pending => write!(f, "{}", FeedbackStatus::PENDING),
            FeedbackStatus::Approved => write!(f, "{}", FeedbackStatus::APPROVED),
            FeedbackStatus::Rejected => write!(f, "{}", FeedbackStatus::REJECTED),
        }
    }
}

impl std::str::FromStr for FeedbackStatus {
    type Err = String;

    // 兼容旧数据中的数字编码 "1"/"2"/"3"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            FeedbackStatus::PENDING | "1" => Ok(FeedbackStatus::Pending),
            FeedbackStatus::APPROVED | "2" => Ok(FeedbackStatus::Approved),
            FeedbackStatus::REJECTED | "3" => Ok(FeedbackStatus::Rejected),
            _ => Err(format!("Invalid feedback status: {s}")),
        }
    }
}

/// 助教个人反馈列表的时间范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackPeriod {
    /// 本月提交的反馈
    Current,
    /// 本月以外提交的反馈
    Past,
}

// 反馈实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i64,
    pub assignment_id: i64,
    pub date_submitted: chrono::NaiveDate,
    pub content: String,
    pub status: FeedbackStatus,
    pub remarks: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 带课程与助教信息的反馈视图
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackDetail {
    #[serde(flatten)]
    pub feedback: Feedback,
    pub course: Option<CourseBrief>,
    pub teaching_assistant: Option<TeachingAssistantSummary>,
}

/// 反馈所属的分配链路，用于权限判断
#[derive(Debug, Clone)]
pub struct FeedbackOwnership {
    pub feedback: Feedback,
    // 提交该反馈的助教用户ID
    pub ta_user_id: i64,
    // 课程负责教师的用户ID
    pub supervisor_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_strings() {
        for status in [
            FeedbackStatus::Pending,
            FeedbackStatus::Approved,
            FeedbackStatus::Rejected,
        ] {
            assert_eq!(status.to_string().parse::<FeedbackStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_status_accepts_legacy_codes() {
        assert_eq!("1".parse::<FeedbackStatus>(), Ok(FeedbackStatus::Pending));
        assert_eq!("2".parse::<FeedbackStatus>(), Ok(FeedbackStatus::Approved));
        assert_eq!("3".parse::<FeedbackStatus>(), Ok(FeedbackStatus::Rejected));
        assert!("4".parse::<FeedbackStatus>().is_err());
    }

    #[test]
    fn test_status_json() {
        assert_eq!(
            serde_json::to_string(&FeedbackStatus::Approved).unwrap(),
            "\"approved\""
        );
        let parsed: FeedbackStatus = serde_json::from_str("\"rejected\"").unwrap();
        assert_eq!(parsed, FeedbackStatus::Rejected);
        assert!(serde_json::from_str::<FeedbackStatus>("\"done\"").is_err());
    }

    #[test]
    fn test_detail_flattens_feedback() {
        let detail = FeedbackDetail {
            feedback: Feedback {
                id: 7,
                assignment_id: 3,
                date_submitted: chrono::NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
                content: "ok".to_string(),
                status: FeedbackStatus::Pending,
                remarks: None,
                created_at: chrono::DateTime::<chrono::Utc>::from_timestamp(0, 0).unwrap(),
                updated_at: chrono::DateTime::<chrono::Utc>::from_timestamp(0, 0).unwrap(),
            },
            course: None,
            teaching_assistant: None,
        };
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["date_submitted"], "2024-05-02");
        assert_eq!(value["status"], "pending");
    }
}
