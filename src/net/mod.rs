//! 网络数据模块
//!
//! 队列所处理的数据包及其头部标志。

mod packet;

pub use packet::{Ecn, Packet};
