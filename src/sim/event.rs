//! 事件 trait
//!
//! 定义仿真事件接口。

use super::simulator::Simulator;
use super::world::World;

/// 事件：可被调度执行。使用 `self: Box<Self>` 以支持 move/所有权转移。
///
/// 事件对其所操作的世界类型 `W` 泛型化，执行时直接拿到具体的世界，无需向下转型。
pub trait Event<W: World>: 'static {
    fn execute(self: Box<Self>, sim: &mut Simulator<W>, world: &mut W);
}
