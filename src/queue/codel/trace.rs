//! 队列事件记录
//!
//! 取代全局 trace 回调：开启后队列把每个决策写成结构化事件，调用方自行取走。

use serde::{Deserialize, Serialize};

use crate::queue::{DropReason, MarkReason};

/// 队列事件类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueueEventKind {
    /// packet 被接纳
    Enqueue,
    /// packet 离开队列交给下游
    Dequeue { sojourn_ns: u64 },
    Drop { reason: DropReason },
    Mark { reason: MarkReason },
    /// dropping 状态切换
    DroppingChanged {
        dropping: bool,
        count: u32,
        last_count: u32,
        drop_next: u32,
    },
}

/// 一条事件（JSON）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEvent {
    /// 仿真时间（纳秒，和 `SimTime.0` 同口径）
    pub t_ns: u64,
    pub pkt_id: Option<u64>,
    /// 事件发生后的队列占用
    pub q_pkts: usize,
    pub q_bytes: u64,
    #[serde(flatten)]
    pub kind: QueueEventKind,
}

/// 内存中的事件收集器
#[derive(Debug, Default)]
pub struct QueueTrace {
    pub events: Vec<QueueEvent>,
}

impl QueueTrace {
    pub fn push(&mut self, ev: QueueEvent) {
        self.events.push(ev);
    }
}
