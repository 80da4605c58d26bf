//! 调度事件
//!
//! 定义调度事件结构及其优先级比较。

use super::event::Event;
use super::time::SimTime;
use super::world::World;
use std::cmp::Ordering;

/// 调度事件，包含执行时间、插入序列号和事件对象。
pub struct ScheduledEvent<W: World> {
    pub(crate) at: SimTime,
    pub(crate) seq: u64,
    pub(crate) ev: Box<dyn Event<W>>,
}

impl<W: World> ScheduledEvent<W> {
    fn key(&self) -> (SimTime, u64) {
        (self.at, self.seq)
    }
}

// BinaryHeap 是 max-heap；需要 (时间, 序列号) 最小者优先，因此反向比较。
// 同一时刻的事件按调度顺序执行，保证 "先 Dequeue 再 Peek" 这类脚本语义。
impl<W: World> Ord for ScheduledEvent<W> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key()).reverse()
    }
}

impl<W: World> PartialOrd for ScheduledEvent<W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<W: World> PartialEq for ScheduledEvent<W> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<W: World> Eq for ScheduledEvent<W> {}
