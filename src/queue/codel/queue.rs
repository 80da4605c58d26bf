//! CoDel queue disc.
//!
//! Enqueue only does byte/packet accounting and the overlimit tail drop.
//! All delay-based decisions happen at dequeue: the head packet's sojourn
//! time drives [`CoDelState`], which may drop several heads in a row before
//! one is handed out. Peek replays the same decisions on a copy of the
//! state, so it never perturbs what the next dequeue will do.

use tracing::{debug, trace};

use crate::net::Packet;
use crate::queue::fifo::Fifo;
use crate::queue::{DropReason, MarkReason, PacketQueue, QueueSize, QueueStats};
use crate::sim::SimTime;

use super::config::{CoDelConfig, ConfigError, Thresholds};
use super::state::{CoDelState, HeadSample, Verdict};
use super::time::CoDelTime;
use super::trace::{QueueEvent, QueueEventKind, QueueTrace};

#[derive(Debug)]
pub struct CoDelQueue {
    config: CoDelConfig,
    th: Thresholds,
    fifo: Fifo,
    state: CoDelState,
    stats: QueueStats,
    trace: Option<QueueTrace>,
}

impl CoDelQueue {
    pub fn new(config: CoDelConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            th: Thresholds::from(&config),
            fifo: Fifo::new(config.max_size),
            state: CoDelState::default(),
            stats: QueueStats::default(),
            trace: None,
            config,
        })
    }

    pub fn target(&self) -> SimTime {
        self.config.target
    }

    pub fn interval(&self) -> SimTime {
        self.config.interval
    }

    /// Snapshot of the control-loop state.
    pub fn state(&self) -> CoDelState {
        self.state
    }

    pub fn is_dropping(&self) -> bool {
        self.state.dropping
    }

    pub fn count(&self) -> u32 {
        self.state.count
    }

    pub fn last_count(&self) -> u32 {
        self.state.last_count
    }

    pub fn drop_next(&self) -> CoDelTime {
        self.state.drop_next
    }

    /// Start recording [`QueueEvent`]s.
    pub fn enable_trace(&mut self) {
        self.trace.get_or_insert_with(QueueTrace::default);
    }

    /// Drain recorded events; empty when tracing is off.
    pub fn take_events(&mut self) -> Vec<QueueEvent> {
        self.trace
            .as_mut()
            .map(|t| std::mem::take(&mut t.events))
            .unwrap_or_default()
    }

    fn record(&mut self, now: SimTime, pkt_id: Option<u64>, kind: QueueEventKind) {
        let Some(t) = &mut self.trace else { return };
        t.push(QueueEvent {
            t_ns: now.0,
            pkt_id,
            q_pkts: self.fifo.len(),
            q_bytes: self.fifo.bytes(),
            kind,
        });
    }

    fn sample(pkt: &Packet, now: SimTime, backlog_bytes: u64) -> HeadSample {
        HeadSample {
            sojourn: CoDelTime::from_sim(pkt.sojourn(now)),
            backlog_bytes,
            markable: pkt.ecn.is_markable(),
        }
    }

    /// `l4s` 取自出队时的原始码点，本次的 target 标记不会把经典 ECN 包变成 L4S。
    fn ce_threshold_exceeded(&self, l4s: bool, sojourn: CoDelTime) -> bool {
        self.th
            .ce_threshold
            .is_some_and(|ce| l4s && sojourn.after(ce))
    }

    fn on_transition(&mut self, now: SimTime, pkt_id: Option<u64>) {
        let s = self.state;
        debug!(
            now = %now,
            dropping = s.dropping,
            count = s.count,
            last_count = s.last_count,
            drop_next = s.drop_next.0,
            "CoDel dropping 状态切换"
        );
        self.record(
            now,
            pkt_id,
            QueueEventKind::DroppingChanged {
                dropping: s.dropping,
                count: s.count,
                last_count: s.last_count,
                drop_next: s.drop_next.0,
            },
        );
    }
}

impl PacketQueue for CoDelQueue {
    fn enqueue(&mut self, mut pkt: Packet, now: SimTime) -> Result<(), Packet> {
        if !self.fifo.admits(&pkt) {
            trace!(pkt_id = pkt.id, size = %self.fifo.current_size(), max = %self.fifo.limit(), "overlimit drop");
            self.stats.record_drop(DropReason::Overlimit, pkt.size_bytes);
            self.record(
                now,
                Some(pkt.id),
                QueueEventKind::Drop {
                    reason: DropReason::Overlimit,
                },
            );
            return Err(pkt);
        }

        pkt.enqueued_at = now;
        let id = pkt.id;
        self.stats.record_enqueue(pkt.size_bytes);
        self.fifo.push_back(pkt);
        self.record(now, Some(id), QueueEventKind::Enqueue);
        Ok(())
    }

    fn dequeue(&mut self, now: SimTime) -> Option<Packet> {
        let now_c = CoDelTime::from_sim(now);

        loop {
            let Some(mut pkt) = self.fifo.pop_front() else {
                let was_dropping = self.state.dropping;
                self.state.on_empty();
                if was_dropping {
                    self.on_transition(now, None);
                }
                return None;
            };

            let l4s = pkt.ecn.is_l4s();
            let head = Self::sample(&pkt, now, self.fifo.bytes());
            let was_dropping = self.state.dropping;
            let verdict = self.state.decide(&self.th, now_c, &head);
            if self.state.dropping != was_dropping {
                self.on_transition(now, Some(pkt.id));
            }

            match verdict {
                Verdict::Drop => {
                    trace!(pkt_id = pkt.id, sojourn = head.sojourn.0, count = self.state.count, "target exceeded drop");
                    self.stats
                        .record_drop(DropReason::TargetExceeded, pkt.size_bytes);
                    self.record(
                        now,
                        Some(pkt.id),
                        QueueEventKind::Drop {
                            reason: DropReason::TargetExceeded,
                        },
                    );
                    continue;
                }
                Verdict::Mark => {
                    pkt.mark_ce();
                    trace!(pkt_id = pkt.id, sojourn = head.sojourn.0, count = self.state.count, "target exceeded mark");
                    self.stats.record_mark(MarkReason::TargetExceeded);
                    self.record(
                        now,
                        Some(pkt.id),
                        QueueEventKind::Mark {
                            reason: MarkReason::TargetExceeded,
                        },
                    );
                }
                Verdict::Deliver => {}
            }

            if self.ce_threshold_exceeded(l4s, head.sojourn) && pkt.mark_ce() {
                trace!(pkt_id = pkt.id, sojourn = head.sojourn.0, "CE threshold exceeded mark");
                self.stats.record_mark(MarkReason::CeThresholdExceeded);
                self.record(
                    now,
                    Some(pkt.id),
                    QueueEventKind::Mark {
                        reason: MarkReason::CeThresholdExceeded,
                    },
                );
            }

            self.stats.record_dequeue(pkt.size_bytes);
            self.record(
                now,
                Some(pkt.id),
                QueueEventKind::Dequeue {
                    sojourn_ns: pkt.sojourn(now).0,
                },
            );
            return Some(pkt);
        }
    }

    fn peek(&self, now: SimTime) -> Option<&Packet> {
        let now_c = CoDelTime::from_sim(now);
        let mut state = self.state;
        let mut backlog = self.fifo.bytes();

        for pkt in self.fifo.iter() {
            backlog = backlog.saturating_sub(u64::from(pkt.size_bytes));
            match state.decide(&self.th, now_c, &Self::sample(pkt, now, backlog)) {
                Verdict::Drop => continue,
                Verdict::Deliver | Verdict::Mark => return Some(pkt),
            }
        }
        None
    }

    fn len(&self) -> usize {
        self.fifo.len()
    }

    fn bytes(&self) -> u64 {
        self.fifo.bytes()
    }

    fn max_size(&self) -> QueueSize {
        self.fifo.limit()
    }

    fn current_size(&self) -> QueueSize {
        self.fifo.current_size()
    }

    fn stats(&self) -> &QueueStats {
        &self.stats
    }
}
