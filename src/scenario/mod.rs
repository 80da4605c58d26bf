//! 脚本化队列实验
//!
//! 用 JSON 描述"在什么时刻对队列做什么"（入队一批包、Dequeue、Peek），
//! 交给事件驱动仿真器执行，并记录每次操作前后的队列大小与丢包/标记计数。

mod runner;
mod spec;

use std::path::PathBuf;

use thiserror::Error;

use crate::queue::codel::ConfigError;

pub use runner::{OpKind, OpRecord, RunOptions, ScenarioReport, ScenarioWorld, run};
pub use spec::{At, Op, OpSpec, Preset, QdiscKind, ScenarioSpec};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scenario JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid queue configuration: {0}")]
    Config(#[from] ConfigError),
}
