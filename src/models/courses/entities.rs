use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    // 课程ID
    pub id: i64,
    // 课程代码，如 CS601
    pub code: String,
    // 课程名称
    pub name: String,
    // 负责教师（用户ID）
    pub supervisor_id: i64,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 更新时间
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 嵌入到反馈、分配视图中的课程摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseBrief {
    pub id: i64,
    pub code: String,
    pub name: String,
}

impl From<&Course> for CourseBrief {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            code: course.code.clone(),
            name: course.name.clone(),
        }
    }
}
