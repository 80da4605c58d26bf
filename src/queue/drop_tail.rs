//! DropTail（尾丢弃）队列
//!
//! 当队列容量不足时，直接丢弃新到达的 packet。不做任何基于时延的判断。

use tracing::trace;

use crate::net::Packet;
use crate::sim::SimTime;

use super::fifo::Fifo;
use super::{DropReason, PacketQueue, QueueSize, QueueStats};

#[derive(Debug)]
pub struct DropTailQueue {
    fifo: Fifo,
    stats: QueueStats,
}

impl DropTailQueue {
    pub fn new(max_size: QueueSize) -> Self {
        Self {
            fifo: Fifo::new(max_size),
            stats: QueueStats::default(),
        }
    }
}

impl PacketQueue for DropTailQueue {
    fn enqueue(&mut self, mut pkt: Packet, now: SimTime) -> Result<(), Packet> {
        if !self.fifo.admits(&pkt) {
            trace!(pkt_id = pkt.id, size = %self.fifo.current_size(), "drop-tail overlimit");
            self.stats.record_drop(DropReason::Overlimit, pkt.size_bytes);
            return Err(pkt);
        }
        pkt.enqueued_at = now;
        self.stats.record_enqueue(pkt.size_bytes);
        self.fifo.push_back(pkt);
        Ok(())
    }

    fn dequeue(&mut self, _now: SimTime) -> Option<Packet> {
        let pkt = self.fifo.pop_front()?;
        self.stats.record_dequeue(pkt.size_bytes);
        Some(pkt)
    }

    fn peek(&self, _now: SimTime) -> Option<&Packet> {
        self.fifo.front()
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
