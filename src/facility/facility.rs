//! 设施
//!
//! 只维护容量、等待队列和统计；事件调度由 `Simulation` 负责。

use super::stats::FacilityStats;
use crate::dist::Distribution;
use crate::error::SimError;
use crate::process::State;
use crate::sim::{FacilityId, ProcessId, SimTime};
use std::collections::VecDeque;
use tracing::trace;

/// 等待队列中的请求
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitEntry {
    pub process: ProcessId,
    /// 获得服务后进入的状态
    pub next_state: State,
    pub enqueued_at: SimTime,
}

/// 容量受限的共享资源
#[derive(Debug, Clone)]
pub struct Facility {
    id: FacilityId,
    name: String,
    capacity: u32,
    free: u32,
    dist: Distribution,
    queue: VecDeque<WaitEntry>,
    pub stats: FacilityStats,
}

impl Facility {
    /// 创建设施；容量为 0 或分布参数非法时返回配置错误
    pub fn new(
        id: FacilityId,
        name: impl Into<String>,
        capacity: u32,
        dist: Distribution,
    ) -> Result<Self, SimError> {
        if capacity == 0 {
            return Err(SimError::InvalidCapacity { id, capacity });
        }
        dist.validate()?;
        Ok(Self {
            id,
            name: name.into(),
            capacity,
            free: capacity,
            dist,
            queue: VecDeque::new(),
            stats: FacilityStats::default(),
        })
    }

    pub fn id(&self) -> FacilityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 配置的总容量
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// 剩余空闲容量
    pub fn free(&self) -> u32 {
        self.free
    }

    pub fn in_service(&self) -> u32 {
        self.capacity - self.free
    }

    pub fn distribution(&self) -> &Distribution {
        &self.dist
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn waiting(&self) -> impl Iterator<Item = &WaitEntry> {
        self.queue.iter()
    }

    /// 有空位时占用一个并返回 true
    pub(crate) fn try_acquire(&mut self) -> bool {
        if self.free == 0 {
            return false;
        }
        self.free -= 1;
        true
    }

    /// 只有在没有空位时才允许排队
    pub(crate) fn enqueue(&mut self, entry: WaitEntry) {
        debug_assert_eq!(self.free, 0, "queueing while a slot is free");
        self.queue.push_back(entry);
        self.stats.max_queue_len = self.stats.max_queue_len.max(self.queue.len());
        trace!(facility = %self.id, queue_len = self.queue.len(), "进程进入等待队列");
    }

    /// 释放一个服务位。
    ///
    /// 队列非空时空位直接交给最早的等待者（空闲容量保持为 0），并累计其等待时间；
    /// 否则空闲容量加一。
    pub(crate) fn release(&mut self, now: SimTime) -> Option<WaitEntry> {
        match self.queue.pop_front() {
            Some(entry) => {
                self.stats.wait_time_total += now.since(entry.enqueued_at);
                Some(entry)
            }
            None => {
                debug_assert!(self.free < self.capacity, "release without a slot in use");
                self.free = (self.free + 1).min(self.capacity);
                None
            }
        }
    }

    pub(crate) fn record_request(&mut self) {
        self.stats.served += 1;
    }

    pub(crate) fn record_service(&mut self, duration: f64) {
        self.stats.work_time_total += duration;
    }

    /// 空位与等待队列不能同时存在
    pub fn invariant_holds(&self) -> bool {
        self.free <= self.capacity && (self.free == 0 || self.queue.is_empty())
    }
}
