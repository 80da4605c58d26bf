//! CoDel（Controlled Delay）队列
//!
//! 基于 Linux `codel.h` 的算法：以排队时延为信号，在 dequeue 时决定交付、丢弃或 ECN 标记。
//!
//! - `time`：32 位回绕的 CoDel 时间及其比较
//! - `rec_inv_sqrt`：1/sqrt(count) 的定点牛顿迭代与控制律
//! - `state`：控制环状态与判定
//! - `queue`：队列本体（Enqueue / Dequeue / Peek）

mod config;
mod queue;
mod rec_inv_sqrt;
mod state;
mod time;
mod trace;

pub use config::{CoDelConfig, ConfigError};
pub use queue::CoDelQueue;
pub use rec_inv_sqrt::{
    REC_INV_SQRT_BITS, REC_INV_SQRT_INIT, REC_INV_SQRT_SHIFT, control_law, newton_step,
    reciprocal_scale,
};
pub use state::{CoDelState, REENTRY_INTERVALS};
pub use time::{CODEL_SHIFT, CoDelTime};
pub use trace::{QueueEvent, QueueEventKind, QueueTrace};
