//! 仿真器
//!
//! 定义事件驱动仿真器，维护当前时间与事件队列。对被测队列而言，它就是外部的
//! 单调时钟与延迟调用设施。

use super::event::Event;
use super::scheduled_event::ScheduledEvent;
use super::time::SimTime;
use super::world::World;
use std::collections::BinaryHeap;
use tracing::{debug, info, trace};

/// 事件驱动仿真器：维护当前时间与事件队列。
pub struct Simulator<W: World> {
    now: SimTime,
    next_seq: u64,
    q: BinaryHeap<ScheduledEvent<W>>,
}

impl<W: World> Default for Simulator<W> {
    fn default() -> Self {
        Self {
            now: SimTime::ZERO,
            next_seq: 0,
            q: BinaryHeap::new(),
        }
    }
}

impl<W: World> std::fmt::Debug for Simulator<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator")
            .field("now", &self.now)
            .field("next_seq", &self.next_seq)
            .field("pending", &self.q.len())
            .finish()
    }
}

impl<W: World> Simulator<W> {
    /// 获取当前仿真时间
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// 尚未执行的事件数
    pub fn pending(&self) -> usize {
        self.q.len()
    }

    /// 调度事件在指定时间执行；早于当前时间的请求会被钳制到 `now`，时钟不会倒退。
    pub fn schedule<E: Event<W>>(&mut self, at: SimTime, ev: E) {
        let at = at.max(self.now);
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        trace!(now = ?self.now, ?at, seq, event_type = std::any::type_name::<E>(), "调度事件");
        self.q.push(ScheduledEvent {
            at,
            seq,
            ev: Box::new(ev),
        });
    }

    /// 在当前时间之后 `delay` 执行
    pub fn schedule_in<E: Event<W>>(&mut self, delay: SimTime, ev: E) {
        self.schedule(self.now.saturating_add(delay), ev);
    }

    /// 运行直到事件队列为空或到达 `until`。
    pub fn run_until(&mut self, until: SimTime, world: &mut W) {
        while self.q.peek().is_some_and(|top| top.at <= until) {
            let Some(item) = self.q.pop() else { break };
            self.dispatch(item, world);
        }
        self.now = self.now.max(until);
    }

    /// 运行所有事件直到队列为空，返回执行的事件数。
    #[tracing::instrument(skip(self, world))]
    pub fn run(&mut self, world: &mut W) -> u64 {
        debug!(now = ?self.now, queue_size = self.q.len(), "初始状态");

        let mut event_count = 0u64;
        while let Some(item) = self.q.pop() {
            event_count += 1;
            self.dispatch(item, world);
        }

        info!(total_events = event_count, final_time = %self.now, "仿真完成");
        event_count
    }

    fn dispatch(&mut self, item: ScheduledEvent<W>, world: &mut W) {
        self.now = item.at;
        trace!(now = ?self.now, seq = item.seq, remaining = self.q.len(), "执行事件");
        item.ev.execute(self, world);
        world.on_tick(self);
    }
}
