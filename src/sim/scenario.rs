//! 场景配置
//!
//! 以 JSON 描述的仿真配置：随机种子、结束时间、设施列表和顾客流。

use super::id::FacilityId;
use super::simulation::Simulation;
use super::time::SimTime;
use crate::dist::{DEFAULT_SEED, Distribution};
use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 当前支持的场景文件格式版本
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSpec {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub end_time: Option<f64>,
    pub facilities: Vec<FacilitySpec>,
    #[serde(default)]
    pub customers: Option<CustomerSpec>,
}

/// 设施配置：`(id, name, capacity, distribution)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilitySpec {
    pub id: FacilityId,
    pub name: String,
    pub capacity: u32,
    pub distribution: Distribution,
}

fn default_linger() -> f64 {
    3.5
}

/// 顾客流配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerSpec {
    pub count: u32,
    /// 到达间隔分布
    pub interarrival: Distribution,
    /// 依次访问的设施；为空时访问所有设施（按标识符顺序）
    #[serde(default)]
    pub route: Vec<FacilityId>,
    /// 离开最后一个设施后的停留时间
    #[serde(default = "default_linger")]
    pub linger: f64,
}

impl Default for ScenarioSpec {
    /// 一个商店、十个位置、正态分布的服务时间
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            seed: None,
            end_time: None,
            facilities: vec![FacilitySpec {
                id: FacilityId(0),
                name: "Shopping".to_string(),
                capacity: 10,
                distribution: Distribution::Normal {
                    mean: 10.0,
                    stddev: 5.0,
                },
            }],
            customers: Some(CustomerSpec {
                count: 50,
                interarrival: Distribution::Exponential { rate: 1.0 },
                route: Vec::new(),
                linger: default_linger(),
            }),
        }
    }
}

impl ScenarioSpec {
    pub fn from_json_str(raw: &str) -> Result<Self, SimError> {
        let spec: ScenarioSpec = serde_json::from_str(raw)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// 校验格式版本、所有分布参数以及顾客路线中的设施引用
    pub fn validate(&self) -> Result<(), SimError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(SimError::UnsupportedSchema(self.schema_version));
        }
        for f in &self.facilities {
            f.distribution.validate()?;
        }
        if let Some(c) = &self.customers {
            c.interarrival.validate()?;
            for id in &c.route {
                if !self.facilities.iter().any(|f| f.id == *id) {
                    return Err(SimError::FacilityNotFound(*id));
                }
            }
        }
        Ok(())
    }

    /// 按配置创建仿真器并注册全部设施。命令行给出的种子优先于文件中的种子。
    pub fn build(&self, seed: Option<u64>) -> Result<Simulation, SimError> {
        let seed = seed.or(self.seed).unwrap_or(DEFAULT_SEED);
        let mut sim = Simulation::with_seed(seed);
        if let Some(end) = self.end_time {
            sim.set_end_time(SimTime(end));
        }
        for f in &self.facilities {
            sim.add_facility(f.id, f.name.clone(), f.capacity, f.distribution)?;
        }
        Ok(sim)
    }
}
