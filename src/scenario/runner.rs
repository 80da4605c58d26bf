use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::net::{Ecn, Packet};
use crate::queue::codel::QueueEvent;
use crate::queue::{
    CoDelConfig, CoDelQueue, DropReason, DropTailQueue, MarkReason, PacketQueue, QueueStats,
};
use crate::sim::{Event, SimTime, Simulator, World};

use super::ScenarioError;
use super::spec::{Op, QdiscKind, ScenarioSpec};

/// 运行选项
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// 在报告中附带队列事件（仅 CoDel）
    pub trace: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    Enqueue,
    Dequeue,
    Peek,
}

/// 单个操作执行前后的观测值
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OpRecord {
    pub t_ns: u64,
    pub op: OpKind,
    /// 出队或 Peek 得到的包；入队操作为空
    pub pkt_id: Option<u64>,
    pub pkt_ecn: Option<Ecn>,
    /// 入队操作被接纳的包数
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted: Option<u32>,
    pub size_before: u64,
    pub size_after: u64,
    pub drops_before: u64,
    pub drops_after: u64,
    pub marks_before: u64,
    pub marks_after: u64,
}

impl OpRecord {
    pub fn summary_line(&self) -> String {
        let verb = match self.op {
            OpKind::Enqueue => "Enqueue",
            OpKind::Dequeue => "Dequeue",
            OpKind::Peek => "Peek",
        };
        let what = match (self.op, self.pkt_id, self.accepted) {
            (OpKind::Enqueue, _, Some(n)) => format!("accepted {n}"),
            (_, Some(id), _) => format!("pkt {id}"),
            _ => "queue empty".to_string(),
        };
        format!(
            "At {} {verb} | {what} | size {} -> {} | target drops {} -> {} | target marks {} -> {}",
            SimTime(self.t_ns),
            self.size_before,
            self.size_after,
            self.drops_before,
            self.drops_after,
            self.marks_before,
            self.marks_after,
        )
    }
}

/// 实验结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub name: Option<String>,
    pub qdisc: QdiscKind,
    pub config: CoDelConfig,
    pub records: Vec<OpRecord>,
    pub stats: QueueStats,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<QueueEvent>,
}

#[derive(Debug)]
enum Qdisc {
    CoDel(CoDelQueue),
    DropTail(DropTailQueue),
}

impl Qdisc {
    fn queue(&mut self) -> &mut dyn PacketQueue {
        match self {
            Qdisc::CoDel(q) => q,
            Qdisc::DropTail(q) => q,
        }
    }
}

/// 实验世界：被测队列 + 观测记录
#[derive(Debug)]
pub struct ScenarioWorld {
    qdisc: Qdisc,
    next_pkt_id: u64,
    records: Vec<OpRecord>,
}

impl World for ScenarioWorld {}

impl ScenarioWorld {
    fn observe(&mut self) -> (u64, u64, u64) {
        let q = self.qdisc.queue();
        let s = q.stats();
        (
            q.current_size().value,
            s.n_dropped(DropReason::TargetExceeded),
            s.n_marked(MarkReason::TargetExceeded),
        )
    }

    fn apply(&mut self, op: &Op, now: SimTime) {
        let (size_before, drops_before, marks_before) = self.observe();
        let mut rec = OpRecord {
            t_ns: now.0,
            op: OpKind::Peek,
            pkt_id: None,
            pkt_ecn: None,
            accepted: None,
            size_before,
            size_after: size_before,
            drops_before,
            drops_after: drops_before,
            marks_before,
            marks_after: marks_before,
        };

        match *op {
            Op::Enqueue {
                count,
                pkt_bytes,
                ecn,
                flow_id,
            } => {
                rec.op = OpKind::Enqueue;
                let mut accepted = 0;
                for _ in 0..count {
                    let id = self.next_pkt_id;
                    self.next_pkt_id += 1;
                    let pkt = Packet::new(id, flow_id, pkt_bytes).with_ecn(ecn);
                    if self.qdisc.queue().enqueue(pkt, now).is_ok() {
                        accepted += 1;
                    }
                }
                rec.accepted = Some(accepted);
            }
            Op::Dequeue => {
                rec.op = OpKind::Dequeue;
                let pkt = self.qdisc.queue().dequeue(now);
                rec.pkt_id = pkt.as_ref().map(|p| p.id);
                rec.pkt_ecn = pkt.as_ref().map(|p| p.ecn);
            }
            Op::Peek => {
                let pkt = self.qdisc.queue().peek(now);
                rec.pkt_id = pkt.map(|p| p.id);
                rec.pkt_ecn = pkt.map(|p| p.ecn);
            }
        }

        (rec.size_after, rec.drops_after, rec.marks_after) = self.observe();
        debug!(line = %rec.summary_line(), "op done");
        self.records.push(rec);
    }
}

/// 在仿真时刻执行一个脚本操作
#[derive(Debug)]
struct RunOp {
    op: Op,
}

impl Event<ScenarioWorld> for RunOp {
    fn execute(self: Box<Self>, sim: &mut Simulator<ScenarioWorld>, world: &mut ScenarioWorld) {
        world.apply(&self.op, sim.now());
    }
}

/// 运行一个实验
#[tracing::instrument(skip_all, fields(name = spec.name.as_deref().unwrap_or("unnamed"), ops = spec.ops.len()))]
pub fn run(spec: &ScenarioSpec, opts: RunOptions) -> Result<ScenarioReport, ScenarioError> {
    let qdisc = match spec.qdisc {
        QdiscKind::Codel => {
            let mut q = CoDelQueue::new(spec.queue.clone())?;
            if opts.trace {
                q.enable_trace();
            }
            Qdisc::CoDel(q)
        }
        QdiscKind::DropTail => {
            spec.queue.validate()?;
            Qdisc::DropTail(DropTailQueue::new(spec.queue.max_size))
        }
    };
    info!(qdisc = ?spec.qdisc, max_size = %spec.queue.max_size, "开始实验");

    let mut world = ScenarioWorld {
        qdisc,
        next_pkt_id: 0,
        records: Vec::with_capacity(spec.ops.len()),
    };
    let mut sim = Simulator::default();
    for o in &spec.ops {
        sim.schedule(o.at.resolve(&spec.queue), RunOp { op: o.op.clone() });
    }
    sim.run(&mut world);

    let ScenarioWorld {
        mut qdisc, records, ..
    } = world;
    let stats = qdisc.queue().stats().clone();
    let events = match &mut qdisc {
        Qdisc::CoDel(q) => q.take_events(),
        Qdisc::DropTail(_) => Vec::new(),
    };
    info!(
        dequeued = stats.dequeued_pkts,
        target_drops = stats.target_exceeded_drops,
        overlimit_drops = stats.overlimit_drops,
        marks = stats.total_marked(),
        "实验结束"
    );

    Ok(ScenarioReport {
        name: spec.name.clone(),
        qdisc: spec.qdisc,
        config: spec.queue.clone(),
        records,
        stats,
        events,
    })
}
