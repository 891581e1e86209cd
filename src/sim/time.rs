//! 仿真时间类型
//!
//! 定义逻辑仿真时间及其运算。时间单位是抽象的（由模型自行解释），用 f64 表示。

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// 仿真时间（抽象时间单位）。
///
/// 使用 `f64::total_cmp` 实现全序，以便直接作为日历的排序键。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimTime(pub f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    /// 从当前时间推进 `delay` 个单位
    pub fn after(self, delay: f64) -> SimTime {
        SimTime(self.0 + delay)
    }

    /// 与更早时间点的差值
    pub fn since(self, earlier: SimTime) -> f64 {
        self.0 - earlier.0
    }

    pub fn as_f64(self) -> f64 {
        self.0
    }
}

impl From<f64> for SimTime {
    fn from(t: f64) -> Self {
        SimTime(t)
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}
