//! 队列策略（Queue disciplines）
//!
//! 提供 CoDel（Controlled Delay）主动队列管理，以及作为对照基线的 DropTail（尾丢弃）队列。

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::net::Packet;
use crate::sim::SimTime;

pub mod codel;
mod drop_tail;
mod fifo;
mod stats;

pub use codel::{CoDelConfig, CoDelQueue};
pub use drop_tail::DropTailQueue;
pub use stats::{DropReason, MarkReason, QueueStats};

/// 一个以太网 MTU 大小的包
pub const DEFAULT_PKT_BYTES: u32 = 1500;

/// 队列容量的计量单位，配置时确定，之后不可变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueSizeUnit {
    Packets,
    Bytes,
}

/// 带单位的队列大小（容量或当前占用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueueSize {
    pub unit: QueueSizeUnit,
    pub value: u64,
}

impl QueueSize {
    pub const fn packets(n: u64) -> Self {
        Self {
            unit: QueueSizeUnit::Packets,
            value: n,
        }
    }

    pub const fn bytes(n: u64) -> Self {
        Self {
            unit: QueueSizeUnit::Bytes,
            value: n,
        }
    }
}

impl fmt::Display for QueueSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            QueueSizeUnit::Packets => write!(f, "{}p", self.value),
            QueueSizeUnit::Bytes => write!(f, "{}B", self.value),
        }
    }
}

/// Packet 队列抽象
///
/// 所有操作都显式接收当前时间 `now`，队列本身不读取任何全局时钟。
pub trait PacketQueue: fmt::Debug {
    /// 入队：成功返回 Ok；若超出容量被丢弃则返回 Err(pkt)
    fn enqueue(&mut self, pkt: Packet, now: SimTime) -> Result<(), Packet>;
    /// 出队：按队列策略返回下一个 packet；队列为空返回 None
    fn dequeue(&mut self, now: SimTime) -> Option<Packet>;
    /// 查看若此刻出队将得到的 packet，不改变任何影响出队结果的状态
    fn peek(&self, now: SimTime) -> Option<&Packet>;

    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn bytes(&self) -> u64;
    fn max_size(&self) -> QueueSize;
    fn current_size(&self) -> QueueSize;
    fn stats(&self) -> &QueueStats;
}
