//! 设施统计报告

use super::facility::Facility;
use crate::sim::FacilityId;
use serde::Serialize;
use std::fmt;

/// 单个设施的统计报告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilityReport {
    pub id: FacilityId,
    pub name: String,
    pub capacity: u32,
    pub served: u64,
    pub wait_time_total: f64,
    pub work_time_total: f64,
    pub max_queue_len: usize,
}

impl From<&Facility> for FacilityReport {
    fn from(f: &Facility) -> Self {
        Self {
            id: f.id(),
            name: f.name().to_string(),
            capacity: f.capacity(),
            served: f.stats.served,
            wait_time_total: f.stats.wait_time_total,
            work_time_total: f.stats.work_time_total,
            max_queue_len: f.stats.max_queue_len,
        }
    }
}

impl fmt::Display for FacilityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Facility {}: {}", self.id, self.name)?;
        writeln!(f, "  served         : {}", self.served)?;
        writeln!(f, "  wait_time_total: {:.3}", self.wait_time_total)?;
        write!(f, "  work_time_total: {:.3}", self.work_time_total)
    }
}
