//! 设施统计信息

use serde::Serialize;

/// 设施统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FacilityStats {
    /// 申请次数（每次 seize 计一次）
    pub served: u64,
    /// 累计排队时间
    pub wait_time_total: f64,
    /// 累计服务时长（抽样得到的时长之和）
    pub work_time_total: f64,
    /// 等待队列的历史最大长度
    pub max_queue_len: usize,
}
