//! CoDel 控制环状态与丢弃/标记判定
//!
//! `CoDelState` 只包含标量字段且实现 `Copy`：出队在真实状态上推进，
//! Peek 在一份拷贝上推演同样的判定，拷贝随后丢弃。

use serde::Serialize;

use super::config::Thresholds;
use super::rec_inv_sqrt::{REC_INV_SQRT_INIT, control_law, newton_step};
use super::time::CoDelTime;

/// 快速重入窗口：上一轮 dropping 结束后 `REENTRY_INTERVALS * interval` 内再次进入时，
/// 沿用上一轮的 count 作为起点。
pub const REENTRY_INTERVALS: u32 = 2;

/// 控制环的全部可变标量状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoDelState {
    /// 是否处于 dropping 状态
    pub dropping: bool,
    /// 本轮 dropping 以来的丢弃/标记次数
    pub count: u32,
    /// 上一轮 dropping 结束时的 count
    pub last_count: u32,
    /// 1/sqrt(count) 的 16 位定点近似
    pub rec_inv_sqrt: u16,
    /// 下一次计划丢弃的时刻
    pub drop_next: CoDelTime,
    /// 排队时延持续高于 target 满一个 interval 的时刻；0 表示未设置
    pub first_above_time: CoDelTime,
}

impl Default for CoDelState {
    fn default() -> Self {
        Self {
            dropping: false,
            count: 0,
            last_count: 0,
            rec_inv_sqrt: REC_INV_SQRT_INIT,
            drop_next: CoDelTime::ZERO,
            first_above_time: CoDelTime::ZERO,
        }
    }
}

/// 判定所需的队头信息
#[derive(Debug, Clone, Copy)]
pub(crate) struct HeadSample {
    pub(crate) sojourn: CoDelTime,
    /// 取走队头之后队列中剩余的字节数
    pub(crate) backlog_bytes: u64,
    /// 包可以用 CE 标记代替丢弃
    pub(crate) markable: bool,
}

/// 对队头包的处置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    Deliver,
    Drop,
    Mark,
}

impl CoDelState {
    /// 队头是否满足丢弃条件。会更新 `first_above_time`。
    pub(crate) fn ok_to_drop(
        &mut self,
        th: &Thresholds,
        now: CoDelTime,
        sojourn: CoDelTime,
        backlog_bytes: u64,
    ) -> bool {
        if sojourn.before(th.target) || backlog_bytes <= th.min_bytes {
            self.first_above_time = CoDelTime::ZERO;
            return false;
        }
        if self.first_above_time == CoDelTime::ZERO {
            let t = now.wrapping_add(th.interval);
            // 0 是"未设置"哨兵
            self.first_above_time = if t == CoDelTime::ZERO { CoDelTime(1) } else { t };
            return false;
        }
        now.after_eq(self.first_above_time)
    }

    /// 对一个队头包推进状态机，返回处置结果。
    pub(crate) fn decide(&mut self, th: &Thresholds, now: CoDelTime, head: &HeadSample) -> Verdict {
        let ok = self.ok_to_drop(th, now, head.sojourn, head.backlog_bytes);

        if self.dropping {
            if !ok {
                self.leave_dropping();
                return Verdict::Deliver;
            }
            if now.before(self.drop_next) {
                return Verdict::Deliver;
            }
            self.count = self.count.saturating_add(1);
            self.rec_inv_sqrt = newton_step(self.rec_inv_sqrt, self.count);
            self.drop_next = control_law(self.drop_next, th.interval, self.rec_inv_sqrt);
        } else {
            if !ok {
                return Verdict::Deliver;
            }
            self.enter_dropping(th, now);
        }

        if th.use_ecn && head.markable {
            Verdict::Mark
        } else {
            Verdict::Drop
        }
    }

    /// 队列被取空
    pub(crate) fn on_empty(&mut self) {
        self.first_above_time = CoDelTime::ZERO;
        if self.dropping {
            self.leave_dropping();
        }
    }

    fn enter_dropping(&mut self, th: &Thresholds, now: CoDelTime) {
        let reentry_window = CoDelTime(th.interval.wrapping_mul(REENTRY_INTERVALS));
        let fast_reentry =
            self.last_count > 0 && now.wrapping_sub(self.drop_next).before(reentry_window);

        self.dropping = true;
        // 进入时的这一次丢弃/标记也计入 count
        if fast_reentry {
            self.count = self.last_count.saturating_add(1);
            self.rec_inv_sqrt = newton_step(self.rec_inv_sqrt, self.count);
        } else {
            self.count = 1;
            self.rec_inv_sqrt = REC_INV_SQRT_INIT;
        }
        self.drop_next = control_law(now, th.interval, self.rec_inv_sqrt);
    }

    fn leave_dropping(&mut self) {
        self.dropping = false;
        self.last_count = self.count;
        self.count = 0;
    }
}
