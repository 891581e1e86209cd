//! 演示和示例代码
//!
//! 商店模型：顾客按到达间隔分布进入，依次申请路线上的设施，离开后停留一段时间再结束。

use crate::dist::Distribution;
use crate::error::SimError;
use crate::process::{Behavior, ProcessSpec, State};
use crate::sim::{
    ACTIVATE_PROCESS_PRIO, FacilityId, ProcessId, SEIZE_FACILITY_PRIO, ScenarioSpec, SimTime,
    Simulation,
};
use serde::Serialize;
use tracing::{debug, info, warn};

/// 顾客的附带数据：到达与离开时间
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomerLog {
    pub arrived: SimTime,
    pub left: Option<SimTime>,
}

/// 顾客行为。
///
/// 状态 `k < route.len()` 表示申请第 `k` 个设施；`k == route.len()` 表示已离开最后一个设施，
/// 开始停留；`route.len() + 1` 表示结束。
#[derive(Debug, Clone)]
pub struct Customer {
    pub route: Vec<FacilityId>,
    pub linger: f64,
}

/// 路线长度对应的“停留”状态；`stop + 1` 也必须能用 `State` 表示
pub(crate) fn stop_state(route_len: usize) -> Option<State> {
    State::try_from(route_len).ok().filter(|s| *s < State::MAX)
}

impl Customer {
    /// 结束状态；路线过长无法用 `State` 编码时返回 None
    pub fn done_state(&self) -> Option<State> {
        stop_state(self.route.len()).map(|s| s + 1)
    }
}

impl Behavior for Customer {
    fn on_state(&mut self, sim: &mut Simulation, me: ProcessId, state: State) {
        let Some(stop) = stop_state(self.route.len()) else {
            warn!(process = %me, route_len = self.route.len(), "路线过长，无法编码为状态");
            return;
        };
        match state {
            s if (0..stop).contains(&s) => {
                let facility = self.route[s as usize];
                if let Err(err) = sim.request_service(me, facility, s + 1, SEIZE_FACILITY_PRIO) {
                    warn!(process = %me, %err, "申请设施失败");
                }
            }
            s if s == stop => {
                sim.wait_for(me, stop + 1, self.linger, ACTIVATE_PROCESS_PRIO);
            }
            _ => {
                let now = sim.now();
                if let Some(log) = sim.payload_mut::<CustomerLog>(me) {
                    log.left = Some(now);
                }
                debug!(process = %me, now = %now, "顾客离开");
            }
        }
    }
}

/// 到达生成器：每次被激活生成一个顾客，然后按到达间隔等待
#[derive(Debug, Clone)]
pub struct Arrivals {
    pub remaining: u32,
    pub interarrival: Distribution,
    pub customer: Customer,
}

impl Behavior for Arrivals {
    fn on_state(&mut self, sim: &mut Simulation, me: ProcessId, _state: State) {
        if self.remaining == 0 {
            return;
        }
        let log = CustomerLog {
            arrived: sim.now(),
            left: None,
        };
        let id = sim.create_process(ProcessSpec::new(self.customer.clone()).payload(log));
        debug!(customer = %id, now = %sim.now(), "顾客到达");

        self.remaining -= 1;
        if self.remaining > 0 {
            let gap = sim.sample(&self.interarrival);
            sim.wait_for(me, 0, gap, ACTIVATE_PROCESS_PRIO);
        }
    }
}

/// 最简单的三段行为：立即激活、等待 3.5、结束
pub fn errand(sim: &mut Simulation, me: ProcessId, state: State) {
    match state {
        0 => sim.activate(me, 1, ACTIVATE_PROCESS_PRIO),
        1 => sim.wait_for(me, 2, 3.5, ACTIVATE_PROCESS_PRIO),
        _ => debug!(process = %me, now = %sim.now(), "errand 完成"),
    }
}

/// 按场景构建商店仿真：注册设施并放入到达生成器
pub fn build_shop(
    scenario: &ScenarioSpec,
    seed: Option<u64>,
    customers: Option<u32>,
) -> Result<Simulation, SimError> {
    let mut sim = scenario.build(seed)?;
    if let Some(spec) = &scenario.customers {
        let route = if spec.route.is_empty() {
            scenario.facilities.iter().map(|f| f.id).collect()
        } else {
            spec.route.clone()
        };
        let arrivals = Arrivals {
            remaining: customers.unwrap_or(spec.count),
            interarrival: spec.interarrival,
            customer: Customer {
                route,
                linger: spec.linger,
            },
        };
        sim.create_process(ProcessSpec::new(arrivals));
    }
    info!(seed = sim.seed(), facilities = scenario.facilities.len(), "商店仿真已构建");
    Ok(sim)
}

/// 顾客层面的汇总
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShopSummary {
    pub customers: usize,
    pub finished: usize,
    /// 已结束顾客的平均逗留时间（含停留）
    pub mean_time_in_system: f64,
}

pub fn summarize(sim: &Simulation) -> ShopSummary {
    let logs: Vec<CustomerLog> = sim
        .processes()
        .filter_map(|p| p.payload::<CustomerLog>().copied())
        .collect();
    let spans: Vec<f64> = logs
        .iter()
        .filter_map(|l| l.left.map(|left| left.since(l.arrived)))
        .collect();
    let mean_time_in_system = if spans.is_empty() {
        0.0
    } else {
        spans.iter().sum::<f64>() / spans.len() as f64
    };
    ShopSummary {
        customers: logs.len(),
        finished: spans.len(),
        mean_time_in_system,
    }
}
