//! CoDel 队列实验
//!
//! 按脚本在指定时刻对 CoDel 队列执行 Enqueue / Dequeue / Peek，打印每一步前后的队列状态。

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use codel_sim::scenario::{self, Preset, RunOptions, ScenarioError, ScenarioSpec};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PresetArg {
    /// 20 个包，无 ECN，Peek 与 Dequeue 交错
    Peek,
    /// 同上，开启 ECN 标记
    PeekEcn,
}

impl From<PresetArg> for Preset {
    fn from(p: PresetArg) -> Self {
        match p {
            PresetArg::Peek => Preset::Peek,
            PresetArg::PeekEcn => Preset::PeekEcn,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "codel_sim", about = "CoDel 队列实验：脚本化 Enqueue/Dequeue/Peek")]
struct Args {
    /// 实验脚本（JSON）
    #[arg(long, conflicts_with = "preset")]
    scenario: Option<PathBuf>,
    /// 内置实验（未指定 --scenario 时默认 peek）
    #[arg(long, value_enum)]
    preset: Option<PresetArg>,
    /// 把报告写成 JSON 文件
    #[arg(long)]
    json: Option<PathBuf>,
    /// 报告中附带队列事件
    #[arg(long)]
    trace: bool,
}

fn run(args: &Args) -> Result<(), ScenarioError> {
    let spec = match &args.scenario {
        Some(path) => ScenarioSpec::load(path)?,
        None => ScenarioSpec::preset(args.preset.unwrap_or(PresetArg::Peek).into()),
    };

    let report = scenario::run(&spec, RunOptions { trace: args.trace })?;

    for rec in &report.records {
        println!("{}", rec.summary_line());
    }
    let s = &report.stats;
    println!(
        "done: dequeued={} target_drops={} overlimit_drops={} target_marks={} ce_marks={}",
        s.dequeued_pkts,
        s.target_exceeded_drops,
        s.overlimit_drops,
        s.target_exceeded_marks,
        s.ce_threshold_marks
    );

    if let Some(path) = &args.json {
        let raw = serde_json::to_string_pretty(&report)?;
        fs::write(path, raw).map_err(|source| ScenarioError::Io {
            path: path.clone(),
            source,
        })?;
        eprintln!("wrote report to {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    // 初始化 tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("codel_sim: {e}");
            ExitCode::FAILURE
        }
    }
}
