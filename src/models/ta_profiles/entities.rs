use serde::{Deserialize, Serialize};

/// 助教所属培养项目
///
/// 数据库中以整数编码存储：1 = M.Tech，2 = Ph.D MHRD，3 = Ph.D VSS。
/// 序列化时同样使用整数编码，便于与报表链接中的 programme_id 保持一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Program {
    MTech,
    PhdMhrd,
    PhdVss,
}

impl Program {
    /// 报表中的固定输出顺序
    pub const ALL: [Program; 3] = [Program::MTech, Program::PhdMhrd, Program::PhdVss];

    pub fn code(&self) -> i32 {
        match self {
            Program::MTech => 1,
            Program::PhdMhrd => 2,
            Program::PhdVss => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Program::MTech => "M.Tech",
            Program::PhdMhrd => "Ph.D MHRD",
            Program::PhdVss => "Ph.D VSS",
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Program::MTech),
            2 => Some(Program::PhdMhrd),
            3 => Some(Program::PhdVss),
            _ => None,
        }
    }
}

impl Serialize for Program {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.code())
    }
}

impl<'de> Deserialize<'de> for Program {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let code = i32::deserialize(deserializer)?;
        Program::from_code(code).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "无效的培养项目: {code}. 支持: 1 (M.Tech), 2 (Ph.D MHRD), 3 (Ph.D VSS)"
            ))
        })
    }
}

impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// 助教档案
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeachingAssistantProfile {
    pub id: i64,
    pub user_id: i64,
    pub program: Program,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 反馈详情中嵌入的助教信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeachingAssistantSummary {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub program: Program,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_codes_and_labels() {
        assert_eq!(Program::MTech.code(), 1);
        assert_eq!(Program::PhdMhrd.code(), 2);
        assert_eq!(Program::PhdVss.code(), 3);
        assert_eq!(Program::MTech.label(), "M.Tech");
        assert_eq!(Program::PhdMhrd.label(), "Ph.D MHRD");
        assert_eq!(Program::PhdVss.label(), "Ph.D VSS");
    }

    #[test]
    fn test_program_from_code() {
        for program in Program::ALL {
            assert_eq!(Program::from_code(program.code()), Some(program));
        }
        assert_eq!(Program::from_code(0), None);
        assert_eq!(Program::from_code(4), None);
    }

    #[test]
    fn test_program_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Program::PhdVss).unwrap(), "3");
        let parsed: Program = serde_json::from_str("2").unwrap();
        assert_eq!(parsed, Program::PhdMhrd);
        assert!(serde_json::from_str::<Program>("7").is_err());
    }
}
