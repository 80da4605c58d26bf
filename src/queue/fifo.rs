//! 带容量上限的 FIFO 存储
//!
//! 同时跟踪包数与字节数，容量按配置的单位（包或字节）判断。

use std::collections::VecDeque;

use crate::net::Packet;

use super::{QueueSize, QueueSizeUnit};

#[derive(Debug)]
pub(crate) struct Fifo {
    limit: QueueSize,
    cur_bytes: u64,
    q: VecDeque<Packet>,
}

impl Fifo {
    pub(crate) fn new(limit: QueueSize) -> Self {
        Self {
            limit,
            cur_bytes: 0,
            q: VecDeque::new(),
        }
    }

    /// 接纳 `pkt` 之后是否仍不超过上限
    pub(crate) fn admits(&self, pkt: &Packet) -> bool {
        match self.limit.unit {
            QueueSizeUnit::Packets => (self.q.len() as u64).saturating_add(1) <= self.limit.value,
            QueueSizeUnit::Bytes => {
                self.cur_bytes.saturating_add(u64::from(pkt.size_bytes)) <= self.limit.value
            }
        }
    }

    pub(crate) fn push_back(&mut self, pkt: Packet) {
        self.cur_bytes = self.cur_bytes.saturating_add(u64::from(pkt.size_bytes));
        self.q.push_back(pkt);
    }

    pub(crate) fn pop_front(&mut self) -> Option<Packet> {
        let pkt = self.q.pop_front()?;
        self.cur_bytes = self.cur_bytes.saturating_sub(u64::from(pkt.size_bytes));
        Some(pkt)
    }

    pub(crate) fn front(&self) -> Option<&Packet> {
        self.q.front()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Packet> {
        self.q.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.q.len()
    }

    pub(crate) fn bytes(&self) -> u64 {
        self.cur_bytes
    }

    pub(crate) fn limit(&self) -> QueueSize {
        self.limit
    }

    pub(crate) fn current_size(&self) -> QueueSize {
        match self.limit.unit {
            QueueSizeUnit::Packets => QueueSize::packets(self.q.len() as u64),
            QueueSizeUnit::Bytes => QueueSize::bytes(self.cur_bytes),
        }
    }
}
