//! 商店仿真
//!
//! 顾客到达、排队使用设施并离开；结束后打印每个设施的统计。

use clap::Parser;
use discsim_rs::demo::{ShopSummary, build_shop, summarize};
use discsim_rs::facility::FacilityReport;
use discsim_rs::sim::{ScenarioSpec, SimTime};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;

#[derive(Debug, Parser)]
#[command(name = "shop", about = "离散事件仿真：顾客排队使用容量受限的设施")]
struct Args {
    /// 随机种子；缺省时使用场景文件中的种子或内置默认值
    seed: Option<u64>,
    /// 场景 JSON 文件；缺省时使用内置的单商店场景
    #[arg(long)]
    scenario: Option<PathBuf>,
    /// 覆盖仿真结束时间
    #[arg(long)]
    end_time: Option<f64>,
    /// 覆盖顾客数量
    #[arg(long)]
    customers: Option<u32>,
    /// 以 JSON 输出统计
    #[arg(long)]
    json: bool,
    /// 打印每个被执行的事件
    #[arg(long)]
    verbose: bool,
}

#[derive(Debug, Serialize)]
struct Output {
    seed: u64,
    final_time: SimTime,
    events: u64,
    summary: ShopSummary,
    facilities: Vec<FacilityReport>,
}

fn main() -> ExitCode {
    // 初始化 tracing（写到 stderr，stdout 留给统计输出）
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

    let scenario = match &args.scenario {
        Some(path) => match ScenarioSpec::from_path(path) {
            Ok(s) => s,
            Err(err) => {
                eprintln!("error: {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => ScenarioSpec::default(),
    };

    let mut sim = match build_shop(&scenario, args.seed, args.customers) {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(end) = args.end_time {
        sim.set_end_time(SimTime(end));
    }

    let mut events = 0;
    while !sim.finished() {
        let Some(ev) = sim.next_event() else {
            break;
        };
        if !ev.can_process() {
            continue;
        }
        if args.verbose {
            let who = ev.process.map_or_else(|| "-".to_string(), |p| p.to_string());
            eprintln!("{:>6.1}: Executing Process:{who}", sim.now().as_f64());
        }
        events += 1;
        if let Err(err) = sim.execute_event(ev) {
            warn!(%err, "事件被丢弃");
        }
    }

    let out = Output {
        seed: sim.seed(),
        final_time: sim.now(),
        events,
        summary: summarize(&sim),
        facilities: sim.report(),
    };

    if args.json {
        match serde_json::to_string_pretty(&out) {
            Ok(s) => println!("{s}"),
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        for r in &out.facilities {
            println!("{r}");
        }
        println!(
            "done @ {}, events={}, customers={}, finished={}, mean_time_in_system={:.3}",
            out.final_time,
            out.events,
            out.summary.customers,
            out.summary.finished,
            out.summary.mean_time_in_system
        );
    }
    ExitCode::SUCCESS
}
