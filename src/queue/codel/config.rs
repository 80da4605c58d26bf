//! CoDel 配置
//!
//! 配置在构造队列时校验一次，之后不可修改。

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::queue::{DEFAULT_PKT_BYTES, QueueSize};
use crate::sim::SimTime;

use super::time::CoDelTime;

/// CoDel 队列配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoDelConfig {
    /// 容量上限（包数或字节数）
    pub max_size: QueueSize,
    /// 目标排队时延
    #[serde(rename = "target_ns")]
    pub target: SimTime,
    /// 滑动窗口宽度
    #[serde(rename = "interval_ns")]
    pub interval: SimTime,
    /// 队列剩余字节不超过此值时不做基于时延的丢弃
    pub min_bytes: u64,
    /// 对支持 ECN 的包用 CE 标记代替丢弃
    pub use_ecn: bool,
    /// 对 ECT(1) 包启用 CE 阈值标记
    pub use_l4s: bool,
    /// L4S 的 CE 标记阈值
    #[serde(rename = "ce_threshold_ns", skip_serializing_if = "Option::is_none")]
    pub ce_threshold: Option<SimTime>,
}

impl Default for CoDelConfig {
    fn default() -> Self {
        Self {
            max_size: QueueSize::packets(1000),
            target: SimTime::from_millis(5),
            interval: SimTime::from_millis(100),
            min_bytes: u64::from(DEFAULT_PKT_BYTES),
            use_ecn: false,
            use_l4s: false,
            ce_threshold: None,
        }
    }
}

/// 配置校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("max_size must be non-zero")]
    ZeroMaxSize,

    #[error("target must be non-zero")]
    ZeroTarget,

    #[error("target ({target}) must be smaller than interval ({interval})")]
    TargetNotBelowInterval { target: SimTime, interval: SimTime },

    #[error("interval ({0}) does not fit in 32-bit CoDel time")]
    IntervalTooLarge(SimTime),

    #[error("ce_threshold is only meaningful with use_l4s enabled")]
    CeThresholdWithoutL4s,

    #[error("use_l4s requires use_ecn")]
    L4sWithoutEcn,
}

impl CoDelConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_size.value == 0 {
            return Err(ConfigError::ZeroMaxSize);
        }
        if self.target == SimTime::ZERO {
            return Err(ConfigError::ZeroTarget);
        }
        if self.target >= self.interval {
            return Err(ConfigError::TargetNotBelowInterval {
                target: self.target,
                interval: self.interval,
            });
        }
        // 控制律与 first_above_time 都做 u32 回绕加法，interval 至多占用半个时钟周期
        if (self.interval.0 >> super::time::CODEL_SHIFT) > u64::from(i32::MAX as u32) {
            return Err(ConfigError::IntervalTooLarge(self.interval));
        }
        if self.ce_threshold.is_some() && !self.use_l4s {
            return Err(ConfigError::CeThresholdWithoutL4s);
        }
        if self.use_l4s && !self.use_ecn {
            return Err(ConfigError::L4sWithoutEcn);
        }
        Ok(())
    }
}

/// 换算成 CoDel 时间单位后的阈值，供判定逻辑使用
#[derive(Debug, Clone, Copy)]
pub(crate) struct Thresholds {
    pub(crate) target: CoDelTime,
    pub(crate) interval: u32,
    pub(crate) min_bytes: u64,
    pub(crate) use_ecn: bool,
    pub(crate) ce_threshold: Option<CoDelTime>,
}

impl From<&CoDelConfig> for Thresholds {
    fn from(cfg: &CoDelConfig) -> Self {
        Self {
            target: CoDelTime::from_sim(cfg.target),
            interval: CoDelTime::from_sim(cfg.interval).0,
            min_bytes: cfg.min_bytes,
            use_ecn: cfg.use_ecn,
            ce_threshold: cfg
                .ce_threshold
                .filter(|_| cfg.use_l4s)
                .map(CoDelTime::from_sim),
        }
    }
}
