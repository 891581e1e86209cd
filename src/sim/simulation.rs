//! 仿真器
//!
//! 持有逻辑时钟、事件日历、进程/设施注册表以及随机时长生成器，
//! 并提供进程使用的调度原语。

use super::calendar::Calendar;
use super::event::{ACTIVATE_PROCESS_PRIO, EXIT_FACILITY_PRIO, Event};
use super::id::{FacilityId, ProcessId};
use super::time::SimTime;
use crate::dist::{DEFAULT_SEED, Distribution, DurationGenerator};
use crate::error::SimError;
use crate::facility::{Facility, FacilityReport, WaitEntry};
use crate::process::{Process, ProcessSpec, State};
use std::any::Any;
use std::collections::BTreeMap;
use tracing::{debug, info, trace, warn};

/// 离散事件仿真器
#[derive(Debug)]
pub struct Simulation {
    now: SimTime,
    end_time: Option<SimTime>,
    calendar: Calendar,
    processes: Vec<Process>,
    facilities: BTreeMap<FacilityId, Facility>,
    rng: DurationGenerator,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

impl Simulation {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用给定种子创建仿真器（整次运行只用这一条随机流）
    pub fn with_seed(seed: u64) -> Self {
        Self {
            now: SimTime::ZERO,
            end_time: None,
            calendar: Calendar::new(),
            processes: Vec::new(),
            facilities: BTreeMap::new(),
            rng: DurationGenerator::new(seed),
        }
    }

    /// 获取当前仿真时间
    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn end_time(&self) -> Option<SimTime> {
        self.end_time
    }

    pub fn set_end_time(&mut self, end: SimTime) {
        self.end_time = Some(end);
    }

    /// 日历中尚未执行的事件数
    pub fn pending_events(&self) -> usize {
        self.calendar.len()
    }

    // ---------------------------------------------------------------------
    // 进程
    // ---------------------------------------------------------------------

    /// 创建进程，首次激活在当前时间
    pub fn create_process(&mut self, spec: ProcessSpec) -> ProcessId {
        self.register(self.now, spec)
    }

    /// 创建进程，首次激活在 `now + delay`
    pub fn create_process_delayed(&mut self, delay: f64, spec: ProcessSpec) -> ProcessId {
        let delay = self.sanitize_delay(delay);
        self.register(self.now.after(delay), spec)
    }

    /// 在绝对时间创建进程；`at` 早于当前时间时拒绝并返回 None
    pub fn create_process_at(&mut self, at: SimTime, spec: ProcessSpec) -> Option<ProcessId> {
        if at < self.now {
            debug!(now = %self.now, at = %at, "拒绝调度到过去的进程");
            return None;
        }
        Some(self.register(at, spec))
    }

    fn register(&mut self, at: SimTime, spec: ProcessSpec) -> ProcessId {
        let id = ProcessId(self.processes.len());
        let (state, priority) = (spec.state, spec.priority);
        self.processes.push(Process::new(id, spec));
        self.calendar
            .schedule(Event::process(id, state, at, priority, self.now));
        debug!(process = %id, state, at = %at, "创建进程");
        id
    }

    pub fn process(&self, id: ProcessId) -> Option<&Process> {
        self.processes.get(id.0)
    }

    pub fn process_mut(&mut self, id: ProcessId) -> Option<&mut Process> {
        self.processes.get_mut(id.0)
    }

    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    pub fn processes(&self) -> impl Iterator<Item = &Process> {
        self.processes.iter()
    }

    /// 读取进程附带的数据
    pub fn payload<T: Any>(&self, id: ProcessId) -> Option<&T> {
        self.process(id)?.payload::<T>()
    }

    pub fn payload_mut<T: Any>(&mut self, id: ProcessId) -> Option<&mut T> {
        self.process_mut(id)?.payload_mut::<T>()
    }

    /// 立即（当前时间）让进程迁移到 `state`
    pub fn activate(&mut self, process: ProcessId, state: State, priority: i32) {
        self.calendar
            .schedule(Event::process(process, state, self.now, priority, self.now));
    }

    /// 以默认优先级立即激活
    pub fn activate_now(&mut self, process: ProcessId, state: State) {
        self.activate(process, state, ACTIVATE_PROCESS_PRIO);
    }

    /// `delay` 之后让进程迁移到 `state`
    pub fn wait_for(&mut self, process: ProcessId, state: State, delay: f64, priority: i32) {
        let delay = self.sanitize_delay(delay);
        let at = self.now.after(delay);
        self.calendar
            .schedule(Event::process(process, state, at, priority, self.now));
    }

    fn sanitize_delay(&self, delay: f64) -> f64 {
        if delay >= 0.0 {
            delay
        } else {
            warn!(delay, "负的延迟被截断为 0");
            0.0
        }
    }

    /// 调度一个不由内核解释的自定义事件；`at` 早于当前时间时返回 false
    pub fn schedule_custom(&mut self, at: SimTime, priority: i32) -> bool {
        if at < self.now {
            return false;
        }
        self.calendar.schedule(Event::custom(at, priority, self.now));
        true
    }

    /// 从仿真器的随机流中抽样（与设施共享同一条流）
    pub fn sample(&mut self, dist: &Distribution) -> f64 {
        self.rng.sample(dist)
    }

    // ---------------------------------------------------------------------
    // 设施
    // ---------------------------------------------------------------------

    /// 注册设施；标识符重复时返回配置错误
    pub fn create_facility(&mut self, facility: Facility) -> Result<FacilityId, SimError> {
        let id = facility.id();
        if self.facilities.contains_key(&id) {
            return Err(SimError::DuplicateFacility(id));
        }
        info!(facility = %id, name = facility.name(), capacity = facility.capacity(), "注册设施");
        self.facilities.insert(id, facility);
        Ok(id)
    }

    /// 由配置元组创建并注册设施
    pub fn add_facility(
        &mut self,
        id: FacilityId,
        name: impl Into<String>,
        capacity: u32,
        dist: Distribution,
    ) -> Result<FacilityId, SimError> {
        let facility = Facility::new(id, name, capacity, dist)?;
        self.create_facility(facility)
    }

    pub fn find_facility(&self, id: FacilityId) -> Option<&Facility> {
        self.facilities.get(&id)
    }

    pub fn facilities(&self) -> impl Iterator<Item = &Facility> {
        self.facilities.values()
    }

    /// 进程申请设施。
    ///
    /// 有空位则立即开始服务，否则进入 FIFO 等待队列；`priority` 只做记录，不影响排队顺序。
    #[tracing::instrument(skip(self), fields(now = %self.now))]
    pub fn seize_facility(
        &mut self,
        process: ProcessId,
        next_state: State,
        facility: FacilityId,
        priority: i32,
    ) -> Result<(), SimError> {
        if process.0 >= self.processes.len() {
            return Err(SimError::ProcessNotFound(process));
        }
        let now = self.now;
        let fac = self
            .facilities
            .get_mut(&facility)
            .ok_or(SimError::FacilityNotFound(facility))?;

        fac.record_request();
        if fac.try_acquire() {
            debug!(free = fac.free(), "有空位，直接开始服务");
            self.activate_process(facility, process, next_state);
        } else {
            fac.enqueue(WaitEntry {
                process,
                next_state,
                enqueued_at: now,
            });
            debug!(queue_len = fac.queue_len(), "设施已满，进入等待队列");
        }
        Ok(())
    }

    /// 进程侧的申请入口，参数顺序为 `(facility, next_state, priority)`
    pub fn request_service(
        &mut self,
        process: ProcessId,
        facility: FacilityId,
        next_state: State,
        priority: i32,
    ) -> Result<(), SimError> {
        self.seize_facility(process, next_state, facility, priority)
    }

    /// 开始服务：抽取服务时长并调度离开事件
    fn activate_process(&mut self, facility: FacilityId, process: ProcessId, next_state: State) {
        let Some(fac) = self.facilities.get_mut(&facility) else {
            warn!(facility = %facility, "开始服务时找不到设施");
            return;
        };
        let duration = self.rng.sample(fac.distribution());
        fac.record_service(duration);

        let at = self.now.after(duration);
        self.calendar.schedule(Event::facility_exit(
            process,
            next_state,
            facility,
            at,
            EXIT_FACILITY_PRIO,
            self.now,
        ));
        debug!(process = %process, facility = %facility, duration, exit_at = %at, "进程开始服务");
    }

    /// 进程离开设施：先分派给进程，再把空位交给下一个等待者或归还
    fn process_exit(&mut self, facility: FacilityId, ev: Event) -> Result<(), SimError> {
        if !self.facilities.contains_key(&facility) {
            return Err(SimError::FacilityNotFound(facility));
        }
        if let Some(process) = ev.process {
            self.dispatch(process, ev.next_state)?;
        }

        let Some(fac) = self.facilities.get_mut(&facility) else {
            return Err(SimError::FacilityNotFound(facility));
        };
        match fac.release(ev.start) {
            Some(next) => {
                debug!(
                    facility = %facility,
                    process = %next.process,
                    waited = ev.start.since(next.enqueued_at),
                    "等待者获得空位"
                );
                self.activate_process(facility, next.process, next.next_state);
            }
            None => {
                trace!(facility = %facility, free = fac.free(), "空位归还");
            }
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // 运行
    // ---------------------------------------------------------------------

    /// 设置进程状态并调用其行为
    pub fn dispatch(&mut self, process: ProcessId, state: State) -> Result<(), SimError> {
        let proc = self
            .processes
            .get_mut(process.0)
            .ok_or(SimError::ProcessNotFound(process))?;
        let old = proc.state;
        let Some(mut behavior) = proc.begin_dispatch(state) else {
            warn!(process = %process, state, "进程没有设置行为，忽略本次分派");
            return Ok(());
        };

        debug!(process = %process, from = old, to = state, now = %self.now, "分派进程");
        // 行为执行期间从注册表中取出，避免 &mut self 与 &mut behavior 的重叠借用。
        behavior.on_state(self, process, state);

        if let Some(proc) = self.processes.get_mut(process.0) {
            proc.restore_behavior(behavior);
        }
        Ok(())
    }

    /// 弹出下一个事件并把时钟推进到它的开始时间
    pub fn next_event(&mut self) -> Option<Event> {
        let ev = self.calendar.pop_next()?;
        debug_assert!(ev.start >= self.now, "event scheduled in the past");
        self.now = self.now.max(ev.start);
        Some(ev)
    }

    /// 日历为空，或设置了结束时间且当前时间已超过它。
    ///
    /// 越过结束时间的第一个事件仍会被弹出执行，之后循环停止。
    pub fn finished(&self) -> bool {
        if self.calendar.is_empty() {
            return true;
        }
        match self.end_time {
            Some(end) => self.now > end,
            None => false,
        }
    }

    /// 与 `finished` 相同，但下一个事件晚于结束时间时也视为结束，时钟不会越过结束时间
    pub fn finished_before_horizon(&self) -> bool {
        let Some(next) = self.calendar.peek_time() else {
            return true;
        };
        match self.end_time {
            Some(end) => self.now > end || next > end,
            None => false,
        }
    }

    /// 执行事件：有设施标识的交给设施离开协议，否则分派给进程
    #[tracing::instrument(skip(self, ev), fields(now = %self.now, process = ?ev.process, facility = ?ev.facility))]
    pub fn execute_event(&mut self, ev: Event) -> Result<(), SimError> {
        match (ev.facility, ev.process) {
            (Some(facility), _) => self.process_exit(facility, ev),
            (None, Some(process)) => self.dispatch(process, ev.next_state),
            (None, None) => {
                trace!("自定义事件，内核不处理");
                Ok(())
            }
        }
    }

    /// 运行直到 `finished()`，返回执行的事件数。查找错误只记录，不中断。
    #[tracing::instrument(skip(self))]
    pub fn run(&mut self) -> u64 {
        info!("▶️  开始运行仿真");
        debug!(now = %self.now, queue_size = self.calendar.len(), "初始状态");

        let mut event_count = 0;
        while !self.finished() {
            let Some(ev) = self.next_event() else {
                break;
            };
            if !ev.can_process() {
                continue;
            }
            event_count += 1;
            if let Err(err) = self.execute_event(ev) {
                warn!(%err, "事件被丢弃");
            }
        }

        info!(
            total_events = event_count,
            final_time = %self.now,
            "✅ 仿真完成"
        );
        event_count
    }

    /// 按设施标识符排序的统计报告
    pub fn report(&self) -> Vec<FacilityReport> {
        self.facilities.values().map(FacilityReport::from).collect()
    }
}
