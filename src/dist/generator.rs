//! 时长生成器
//!
//! 每次运行只有一条伪随机流，所有设施共享，保证同一种子下的抽样序列可复现。

use super::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Exp1, StandardNormal};
use tracing::trace;

/// 未指定种子时使用的默认值
pub const DEFAULT_SEED: u64 = 5489;

#[derive(Debug, Clone)]
pub struct DurationGenerator {
    seed: u64,
    draws: u64,
    rng: StdRng,
}

impl DurationGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            draws: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// 已抽样次数
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// 从分布中抽取一个时长。
    ///
    /// 正态分布可能给出负值，这里截断到 0，保证事件不会被调度到过去。
    pub fn sample(&mut self, dist: &Distribution) -> f64 {
        self.draws += 1;
        let raw = match *dist {
            Distribution::Uniform { low, high } => self.rng.gen_range(low..=high),
            Distribution::Exponential { rate } => {
                let x: f64 = self.rng.sample(Exp1);
                x / rate
            }
            Distribution::Normal { mean, stddev } => {
                let z: f64 = self.rng.sample(StandardNormal);
                mean + stddev * z
            }
        };
        let d = raw.max(0.0);
        trace!(draw = self.draws, kind = ?dist.kind(), duration = d, "抽样时长");
        d
    }
}

impl Default for DurationGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}
