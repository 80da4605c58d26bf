//! 数据包类型
//!
//! 定义队列中流动的数据包及其 ECN 码点。

use serde::{Deserialize, Serialize};

use crate::sim::SimTime;

/// IP 头中的 ECN 码点（RFC 3168 / RFC 9331）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ecn {
    /// 发送端不支持 ECN
    #[default]
    NotEct,
    /// ECN-capable transport (0)，经典 ECN
    Ect0,
    /// ECN-capable transport (1)，L4S 标识
    Ect1,
    /// Congestion Experienced
    Ce,
}

impl Ecn {
    /// 发送端声明了 ECN 能力（ECT(0) 或 ECT(1)）
    pub fn is_ect(self) -> bool {
        matches!(self, Ecn::Ect0 | Ecn::Ect1)
    }

    pub fn is_ce(self) -> bool {
        self == Ecn::Ce
    }

    /// 可以用 CE 标记代替丢弃：ECT 包或已经被标记过的包
    pub fn is_markable(self) -> bool {
        self.is_ect() || self.is_ce()
    }

    /// L4S 流量：ECT(1)，或者上游已经打上 CE 的包
    pub fn is_l4s(self) -> bool {
        matches!(self, Ecn::Ect1 | Ecn::Ce)
    }
}

/// 队列中的数据包
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub id: u64,
    pub flow_id: u64,
    pub size_bytes: u32,
    pub ecn: Ecn,
    /// 入队时刻，由队列在接纳时写入
    pub enqueued_at: SimTime,
}

impl Packet {
    pub fn new(id: u64, flow_id: u64, size_bytes: u32) -> Self {
        Self {
            id,
            flow_id,
            size_bytes,
            ecn: Ecn::NotEct,
            enqueued_at: SimTime::ZERO,
        }
    }

    pub fn with_ecn(mut self, ecn: Ecn) -> Self {
        self.ecn = ecn;
        self
    }

    /// 尝试打 CE 标记；不具备 ECN 能力的包保持不变并返回 false。
    pub fn mark_ce(&mut self) -> bool {
        if !self.ecn.is_markable() {
            return false;
        }
        self.ecn = Ecn::Ce;
        true
    }

    /// 在 `now` 时刻的排队时延
    pub fn sojourn(&self, now: SimTime) -> SimTime {
        now.saturating_sub(self.enqueued_at)
    }
}
