//! 世界 trait
//!
//! 定义仿真世界接口。

use super::simulator::Simulator;

/// 仿真世界：由业务层实现（例如被测队列与实验记录）。
pub trait World: Sized + 'static {
    /// 每个事件执行完毕后回调一次。
    fn on_tick(&mut self, _sim: &mut Simulator<Self>) {}
}
