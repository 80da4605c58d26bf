use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::net::Ecn;
use crate::queue::{CoDelConfig, DEFAULT_PKT_BYTES, QueueSize};
use crate::sim::SimTime;

use super::ScenarioError;

/// 一个脚本化实验：队列配置 + 在指定时刻执行的操作序列
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSpec {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub qdisc: QdiscKind,
    #[serde(default)]
    pub queue: CoDelConfig,
    pub ops: Vec<OpSpec>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QdiscKind {
    #[default]
    Codel,
    /// 仅使用 `queue.max_size`，作为对照基线
    DropTail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpSpec {
    pub at: At,
    #[serde(flatten)]
    pub op: Op,
}

/// 操作时刻：绝对时间，或 target / interval 的倍数
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum At {
    Ns(u64),
    Us(f64),
    Ms(f64),
    Targets(f64),
    Intervals(f64),
}

impl At {
    pub fn resolve(self, cfg: &CoDelConfig) -> SimTime {
        match self {
            At::Ns(ns) => SimTime(ns),
            At::Us(us) => SimTime::from_micros(1).mul_f64(us),
            At::Ms(ms) => SimTime::from_millis(1).mul_f64(ms),
            At::Targets(k) => cfg.target.mul_f64(k),
            At::Intervals(k) => cfg.interval.mul_f64(k),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    /// 连续入队 `count` 个同样大小的包
    Enqueue {
        #[serde(default = "default_count")]
        count: u32,
        #[serde(default = "default_pkt_bytes")]
        pkt_bytes: u32,
        #[serde(default)]
        ecn: Ecn,
        #[serde(default)]
        flow_id: u64,
    },
    Dequeue,
    Peek,
}

fn default_count() -> u32 {
    1
}

fn default_pkt_bytes() -> u32 {
    DEFAULT_PKT_BYTES
}

/// 内置实验
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// 20 个 1000B 包、500 包上限、无 ECN，Peek 与 Dequeue 交错
    Peek,
    /// 同上，但开启 ECN 且包为 ECT(0)
    PeekEcn,
}

impl ScenarioSpec {
    pub fn from_json_str(raw: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let raw = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn preset(preset: Preset) -> Self {
        let (name, use_ecn, ecn) = match preset {
            Preset::Peek => ("peek", false, Ecn::NotEct),
            Preset::PeekEcn => ("peek_ecn", true, Ecn::Ect0),
        };
        let queue = CoDelConfig {
            max_size: QueueSize::packets(500),
            use_ecn,
            ..CoDelConfig::default()
        };
        let target = queue.target;
        let interval = queue.interval;

        let mut ops = vec![OpSpec {
            at: At::Ns(0),
            op: Op::Enqueue {
                count: 20,
                pkt_bytes: 1000,
                ecn,
                flow_id: 0,
            },
        }];
        let mut push = |t: SimTime, op: Op| ops.push(OpSpec { at: At::Ns(t.0), op });

        push(target.mul_f64(0.3), Op::Peek);
        push(target.mul_f64(0.5), Op::Peek);
        let mut t = target.mul_f64(2.0);
        push(t, Op::Dequeue);
        push(t, Op::Peek);
        t = target.mul_f64(2.5);
        push(t, Op::Peek);
        t = t.saturating_add(interval);
        push(t, Op::Dequeue);
        push(t, Op::Peek);
        t = t.mul_f64(1.5);
        push(t, Op::Peek);
        t = t.saturating_add(interval);
        push(t, Op::Dequeue);
        push(t, Op::Peek);
        push(t, Op::Peek);
        t = t.saturating_add(interval);
        push(t, Op::Dequeue);
        push(t, Op::Peek);
        t = t.mul_f64(1.5);
        push(t, Op::Peek);
        push(t, Op::Dequeue);

        Self {
            name: Some(name.to_string()),
            qdisc: QdiscKind::Codel,
            queue,
            ops,
        }
    }
}
