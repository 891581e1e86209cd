//! 事件记录
//!
//! 定义日历中的事件以及默认优先级常量。事件创建后不可变，也不可取消。

use super::id::{FacilityId, ProcessId};
use super::time::SimTime;
use crate::process::State;

/// 创建进程时首次激活事件的优先级
pub const CREATE_PROCESS_PRIO: i32 = 60;
/// `activate` / `wait_for` 的默认优先级
pub const ACTIVATE_PROCESS_PRIO: i32 = 50;
/// 离开设施事件的优先级
pub const EXIT_FACILITY_PRIO: i32 = 30;
/// 申请设施的默认优先级
pub const SEIZE_FACILITY_PRIO: i32 = 20;

/// 调度事件。优先级越大越先执行（同一时刻内）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub process: Option<ProcessId>,
    pub next_state: State,
    /// 仅离开设施事件携带
    pub facility: Option<FacilityId>,
    pub start: SimTime,
    pub priority: i32,
    pub created: SimTime,
}

impl Event {
    /// 进程状态迁移事件
    pub fn process(
        process: ProcessId,
        next_state: State,
        start: SimTime,
        priority: i32,
        created: SimTime,
    ) -> Self {
        Self {
            process: Some(process),
            next_state,
            facility: None,
            start,
            priority,
            created,
        }
    }

    /// 进程离开设施事件
    pub fn facility_exit(
        process: ProcessId,
        next_state: State,
        facility: FacilityId,
        start: SimTime,
        priority: i32,
        created: SimTime,
    ) -> Self {
        Self {
            process: Some(process),
            next_state,
            facility: Some(facility),
            start,
            priority,
            created,
        }
    }

    /// 自定义事件：既不属于进程也不属于设施，内核不解释，只负责按序弹出。
    pub fn custom(start: SimTime, priority: i32, created: SimTime) -> Self {
        Self {
            process: None,
            next_state: 0,
            facility: None,
            start,
            priority,
            created,
        }
    }

    pub fn is_process_event(&self) -> bool {
        self.process.is_some() && self.facility.is_none()
    }

    pub fn is_facility_event(&self) -> bool {
        self.facility.is_some()
    }

    /// 内核能否处理该事件（自定义事件由调用方自行消费）
    pub fn can_process(&self) -> bool {
        self.process.is_some() || self.facility.is_some()
    }
}
