//! 队列统计
//!
//! 按原因分类的丢包/标记计数。

use std::fmt;

use serde::{Deserialize, Serialize};

/// 丢包原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// 排队时延持续高于 target，由控制律丢弃
    TargetExceeded,
    /// 入队时超过容量上限，尾丢弃
    Overlimit,
}

impl DropReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            DropReason::TargetExceeded => "Target exceeded drop",
            DropReason::Overlimit => "Overlimit drop",
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CE 标记原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkReason {
    /// 控制律判定应丢弃，但包支持 ECN，改为标记
    TargetExceeded,
    /// L4S：排队时延超过 CE 阈值
    CeThresholdExceeded,
}

impl MarkReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            MarkReason::TargetExceeded => "Target exceeded mark",
            MarkReason::CeThresholdExceeded => "CE threshold exceeded mark",
        }
    }
}

impl fmt::Display for MarkReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 队列累计计数器
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub enqueued_pkts: u64,
    pub enqueued_bytes: u64,
    pub dequeued_pkts: u64,
    pub dequeued_bytes: u64,
    pub dropped_bytes: u64,
    pub target_exceeded_drops: u64,
    pub overlimit_drops: u64,
    pub target_exceeded_marks: u64,
    pub ce_threshold_marks: u64,
}

impl QueueStats {
    pub fn n_dropped(&self, reason: DropReason) -> u64 {
        match reason {
            DropReason::TargetExceeded => self.target_exceeded_drops,
            DropReason::Overlimit => self.overlimit_drops,
        }
    }

    pub fn n_marked(&self, reason: MarkReason) -> u64 {
        match reason {
            MarkReason::TargetExceeded => self.target_exceeded_marks,
            MarkReason::CeThresholdExceeded => self.ce_threshold_marks,
        }
    }

    pub fn total_dropped(&self) -> u64 {
        self.target_exceeded_drops
            .saturating_add(self.overlimit_drops)
    }

    pub fn total_marked(&self) -> u64 {
        self.target_exceeded_marks
            .saturating_add(self.ce_threshold_marks)
    }

    pub(crate) fn record_enqueue(&mut self, bytes: u32) {
        self.enqueued_pkts += 1;
        self.enqueued_bytes = self.enqueued_bytes.saturating_add(u64::from(bytes));
    }

    pub(crate) fn record_dequeue(&mut self, bytes: u32) {
        self.dequeued_pkts += 1;
        self.dequeued_bytes = self.dequeued_bytes.saturating_add(u64::from(bytes));
    }

    pub(crate) fn record_drop(&mut self, reason: DropReason, bytes: u32) {
        self.dropped_bytes = self.dropped_bytes.saturating_add(u64::from(bytes));
        match reason {
            DropReason::TargetExceeded => self.target_exceeded_drops += 1,
            DropReason::Overlimit => self.overlimit_drops += 1,
        }
    }

    pub(crate) fn record_mark(&mut self, reason: MarkReason) {
        match reason {
            MarkReason::TargetExceeded => self.target_exceeded_marks += 1,
            MarkReason::CeThresholdExceeded => self.ce_threshold_marks += 1,
        }
    }
}
