use serde::{Deserialize, Serialize};

use crate::models::ta_profiles::entities::Program;

/// 单个培养项目在某月的反馈统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgrammeFeedbackCount {
    pub programme: String,
    pub submitted: u64,
    pub approved: u64,
    pub rejected: u64,
    pub pending: u64,
    pub link: String,
}

impl ProgrammeFeedbackCount {
    pub fn empty(program: Program, link: String) -> Self {
        Self {
            programme: program.label().to_string(),
            submitted: 0,
            approved: 0,
            rejected: 0,
            pending: 0,
            link,
        }
    }
}
