//! 事件日历
//!
//! 以二叉堆维护待执行事件，按 (时间, 优先级, 创建时间, 序列号) 全序弹出。

use super::event::Event;
use super::time::SimTime;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::trace;

/// 日历中的条目：事件加上插入序列号。
#[derive(Debug)]
struct ScheduledEvent {
    seq: u64,
    ev: Event,
}

impl ScheduledEvent {
    /// 升序比较：越“小”越先执行。
    fn order(&self, other: &Self) -> Ordering {
        self.ev
            .start
            .cmp(&other.ev.start)
            .then_with(|| other.ev.priority.cmp(&self.ev.priority))
            .then_with(|| self.ev.created.cmp(&other.ev.created))
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

// BinaryHeap 是 max-heap；我们需要最小者优先，因此反向比较。
impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order(other).reverse()
    }
}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for ScheduledEvent {}

/// 事件日历
#[derive(Debug, Default)]
pub struct Calendar {
    next_seq: u64,
    q: BinaryHeap<ScheduledEvent>,
}

impl Calendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入事件，O(log n)
    pub fn schedule(&mut self, ev: Event) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        trace!(seq, start = %ev.start, priority = ev.priority, "事件加入日历");
        self.q.push(ScheduledEvent { seq, ev });
    }

    /// 弹出最早的事件；日历为空时返回 None
    pub fn pop_next(&mut self) -> Option<Event> {
        self.q.pop().map(|item| item.ev)
    }

    /// 下一个事件的开始时间
    pub fn peek_time(&self) -> Option<SimTime> {
        self.q.peek().map(|item| item.ev.start)
    }

    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }

    pub fn len(&self) -> usize {
        self.q.len()
    }
}
