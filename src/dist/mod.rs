//! 服务时间分布
//!
//! 支持均匀分布、指数分布与正态分布。参数在构造时校验，非法参数属于配置错误。

mod generator;

pub use generator::{DEFAULT_SEED, DurationGenerator};

use crate::error::SimError;
use serde::{Deserialize, Serialize};

/// 分布种类（对应配置元组中的 `distribution_kind`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistKind {
    Uniform,
    Exponential,
    Normal,
}

/// 时长分布
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Distribution {
    /// `[low, high]` 上的均匀分布
    Uniform { low: f64, high: f64 },
    /// 指数分布，均值为 `1 / rate`
    Exponential { rate: f64 },
    Normal { mean: f64, stddev: f64 },
}

impl Distribution {
    pub fn uniform(low: f64, high: f64) -> Result<Self, SimError> {
        let d = Distribution::Uniform { low, high };
        d.validate()?;
        Ok(d)
    }

    pub fn exponential(rate: f64) -> Result<Self, SimError> {
        let d = Distribution::Exponential { rate };
        d.validate()?;
        Ok(d)
    }

    pub fn normal(mean: f64, stddev: f64) -> Result<Self, SimError> {
        let d = Distribution::Normal { mean, stddev };
        d.validate()?;
        Ok(d)
    }

    /// 由 `(kind, a, b)` 构造；指数分布忽略 `b`
    pub fn from_params(kind: DistKind, a: f64, b: f64) -> Result<Self, SimError> {
        match kind {
            DistKind::Uniform => Self::uniform(a, b),
            DistKind::Exponential => Self::exponential(a),
            DistKind::Normal => Self::normal(a, b),
        }
    }

    pub fn kind(&self) -> DistKind {
        match self {
            Distribution::Uniform { .. } => DistKind::Uniform,
            Distribution::Exponential { .. } => DistKind::Exponential,
            Distribution::Normal { .. } => DistKind::Normal,
        }
    }

    /// 校验参数。反序列化得到的分布也要经过这里。
    pub fn validate(&self) -> Result<(), SimError> {
        match *self {
            Distribution::Uniform { low, high } => {
                if !low.is_finite() || !high.is_finite() {
                    return Err(SimError::InvalidDistribution(format!(
                        "uniform bounds must be finite, got [{low}, {high}]"
                    )));
                }
                if low > high {
                    return Err(SimError::InvalidDistribution(format!(
                        "uniform low bound {low} exceeds high bound {high}"
                    )));
                }
            }
            Distribution::Exponential { rate } => {
                if !(rate.is_finite() && rate > 0.0) {
                    return Err(SimError::InvalidDistribution(format!(
                        "exponential rate must be positive, got {rate}"
                    )));
                }
            }
            Distribution::Normal { mean, stddev } => {
                if !mean.is_finite() || !(stddev.is_finite() && stddev >= 0.0) {
                    return Err(SimError::InvalidDistribution(format!(
                        "normal requires finite mean and stddev >= 0, got ({mean}, {stddev})"
                    )));
                }
            }
        }
        Ok(())
    }

    /// 理论均值
    pub fn mean(&self) -> f64 {
        match *self {
            Distribution::Uniform { low, high } => (low + high) / 2.0,
            Distribution::Exponential { rate } => 1.0 / rate,
            Distribution::Normal { mean, .. } => mean,
        }
    }
}
