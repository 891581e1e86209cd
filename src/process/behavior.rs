//! 行为 trait
//!
//! 行为是协作式的：通过调用仿真器的调度原语表达“等待/申请设施/结束”，然后返回。

use super::State;
use crate::sim::{ProcessId, Simulation};

/// 进程行为：每次事件分派时被调用一次。
pub trait Behavior: 'static {
    fn on_state(&mut self, sim: &mut Simulation, me: ProcessId, state: State);
}

impl<F> Behavior for F
where
    F: FnMut(&mut Simulation, ProcessId, State) + 'static,
{
    fn on_state(&mut self, sim: &mut Simulation, me: ProcessId, state: State) {
        (*self)(sim, me, state)
    }
}
