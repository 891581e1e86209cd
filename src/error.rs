//! 错误类型
//!
//! 两类错误：查找错误（引用了不存在的进程/设施，只记录不中断仿真）与
//! 配置错误（构造时参数非法，直接失败）。场景文件的读取/解析错误单独列出。

use crate::sim::{FacilityId, ProcessId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("process {0} not found")]
    ProcessNotFound(ProcessId),

    #[error("facility {0} not found")]
    FacilityNotFound(FacilityId),

    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),

    #[error("facility {id} has invalid capacity {capacity}")]
    InvalidCapacity { id: FacilityId, capacity: u32 },

    #[error("facility {0} already exists")]
    DuplicateFacility(FacilityId),

    #[error("unsupported scenario schema version {0}")]
    UnsupportedSchema(u32),

    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SimError {
    /// 是否为查找错误（可忽略、仿真继续）
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            SimError::ProcessNotFound(_) | SimError::FacilityNotFound(_)
        )
    }

    /// 是否为配置错误
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SimError::InvalidDistribution(_)
                | SimError::InvalidCapacity { .. }
                | SimError::DuplicateFacility(_)
                | SimError::UnsupportedSchema(_)
        )
    }
}
