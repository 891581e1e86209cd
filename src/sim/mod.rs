//! 仿真核心模块
//!
//! 此模块包含离散事件仿真的核心组件：仿真时间、事件、日历和仿真器。

// 子模块声明
mod calendar;
mod event;
mod id;
mod scenario;
mod simulation;
mod time;

// 重新导出公共接口
pub use calendar::Calendar;
pub use event::{
    ACTIVATE_PROCESS_PRIO, CREATE_PROCESS_PRIO, EXIT_FACILITY_PRIO, Event, SEIZE_FACILITY_PRIO,
};
pub use id::{FacilityId, ProcessId};
pub use scenario::{CustomerSpec, FacilitySpec, SCHEMA_VERSION, ScenarioSpec};
pub use simulation::Simulation;
pub use time::SimTime;
