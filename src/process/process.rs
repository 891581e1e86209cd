//! 进程记录
//!
//! 进程由仿真器持有；跨引用一律使用 `ProcessId`，在使用时通过注册表解析。

use super::State;
use super::behavior::Behavior;
use crate::sim::{CREATE_PROCESS_PRIO, ProcessId};
use std::any::Any;
use std::fmt;

/// 创建进程所需的参数
pub struct ProcessSpec {
    pub(crate) behavior: Option<Box<dyn Behavior>>,
    pub(crate) state: State,
    pub(crate) priority: i32,
    pub(crate) payload: Option<Box<dyn Any>>,
}

impl ProcessSpec {
    pub fn new(behavior: impl Behavior) -> Self {
        Self {
            behavior: Some(Box::new(behavior)),
            ..Self::without_behavior()
        }
    }

    /// 不带行为的进程：分派时只记录警告
    pub fn without_behavior() -> Self {
        Self {
            behavior: None,
            state: 0,
            priority: CREATE_PROCESS_PRIO,
            payload: None,
        }
    }

    pub fn state(mut self, state: State) -> Self {
        self.state = state;
        self
    }

    /// 首次激活事件的优先级
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn payload<T: Any>(mut self, payload: T) -> Self {
        self.payload = Some(Box::new(payload));
        self
    }
}

/// 仿真中的进程
pub struct Process {
    id: ProcessId,
    pub(crate) state: State,
    pub(crate) behavior: Option<Box<dyn Behavior>>,
    pub(crate) payload: Option<Box<dyn Any>>,
    dispatches: u64,
}

impl Process {
    pub(crate) fn new(id: ProcessId, spec: ProcessSpec) -> Self {
        Self {
            id,
            state: spec.state,
            behavior: spec.behavior,
            payload: spec.payload,
            dispatches: 0,
        }
    }

    pub fn id(&self) -> ProcessId {
        self.id
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn has_behavior(&self) -> bool {
        self.behavior.is_some()
    }

    /// 行为被调用的次数
    pub fn dispatches(&self) -> u64 {
        self.dispatches
    }

    pub fn set_behavior(&mut self, behavior: impl Behavior) {
        self.behavior = Some(Box::new(behavior));
    }

    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.as_ref()?.downcast_ref::<T>()
    }

    pub fn payload_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.payload.as_mut()?.downcast_mut::<T>()
    }

    /// 设置新状态并取出行为（调用结束后由 `restore_behavior` 放回）
    pub(crate) fn begin_dispatch(&mut self, state: State) -> Option<Box<dyn Behavior>> {
        self.state = state;
        self.dispatches += 1;
        self.behavior.take()
    }

    /// 放回行为；若回调期间设置了新行为则保留新的
    pub(crate) fn restore_behavior(&mut self, behavior: Box<dyn Behavior>) {
        if self.behavior.is_none() {
            self.behavior = Some(behavior);
        }
    }
}

impl fmt::Debug for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Process")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("has_behavior", &self.behavior.is_some())
            .field("has_payload", &self.payload.is_some())
            .field("dispatches", &self.dispatches)
            .finish()
    }
}
