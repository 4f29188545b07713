use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::executor::Scheduler;
use crate::host::HostLoop;
use crate::program::ProgramBuilder;
use crate::types::SuspendPoint;

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Cadence - cooperative coroutine scheduler for host-driven loops", long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default search)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a sample coroutine through the reference host loop
    Demo {
        /// Maximum frames to step in offline mode
        #[arg(long, default_value = "600")]
        frames: u64,

        /// Number of passes over the sample program
        #[arg(short = 'r', long = "repeats", default_value = "1")]
        repeats: i64,

        /// Drive the loop in real time instead of stepping offline
        #[arg(long)]
        realtime: bool,

        /// Wall-clock seconds to run in realtime mode
        #[arg(long, default_value = "5")]
        seconds: f64,
    },

    /// Measure tick throughput with many looped coroutines
    Bench {
        /// Number of looped executions
        #[arg(long, default_value = "1000")]
        executions: usize,

        /// Number of frames to step
        #[arg(long, default_value = "600")]
        frames: u64,
    },

    /// Print the effective configuration as TOML
    Config,
}

/// Run the CLI by parsing process arguments
pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    run_cli_with_args(cli).await
}

/// Run the CLI with provided arguments
pub async fn run_cli_from_args(args: Vec<String>) -> Result<()> {
    let cli = Cli::parse_from(args);
    run_cli_with_args(cli).await
}

/// Internal function that handles CLI commands
async fn run_cli_with_args(cli: Cli) -> Result<()> {
    // Load and validate configuration before executing any command
    let config = Config::builder()
        .config_path(cli.config)
        .build()
        .context("Failed to load configuration")?;

    init_tracing(&config.logging.filter);

    match cli.command {
        Commands::Demo {
            frames,
            repeats,
            realtime,
            seconds,
        } => {
            let run = if realtime {
                DemoRun::Realtime(Duration::from_secs_f64(seconds.max(0.0)))
            } else {
                DemoRun::Offline(frames)
            };
            run_demo(&config, repeats, run).await?;
        }

        Commands::Bench { executions, frames } => {
            use crate::benchmark;

            let params = benchmark::BenchmarkParams { executions, frames };
            benchmark::run_benchmark(&config, params)?;
        }

        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

/// Install the global subscriber; `RUST_LOG` wins over the configured filter
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/* ===================== Demo ===================== */

pub enum DemoRun {
    Offline(u64),
    Realtime(Duration),
}

/// Outcome of a demo run
#[derive(Debug)]
pub struct DemoSummary {
    pub frames: u64,
    pub heartbeats: u32,
    pub finished: bool,
}

/// Start the sample program next to a looped heartbeat and drive both
pub async fn run_demo(config: &Config, repeats: i64, run: DemoRun) -> Result<DemoSummary> {
    let scheduler = Scheduler::with_config(config.scheduler.clone());
    let accumulation_point = config.host.accumulation_point.clone();
    let heartbeats = Rc::new(Cell::new(0u32));

    let beat = heartbeats.clone();
    let heartbeat_program = ProgramBuilder::new()
        .wait_seconds(0.25)
        .run(move || {
            beat.set(beat.get() + 1);
            tracing::debug!(count = beat.get(), "Heartbeat");
        })
        .build()?;
    let mut heartbeat = scheduler.start_looped(heartbeat_program, accumulation_point.clone());

    let last_phase = config
        .host
        .phases
        .last()
        .cloned()
        .unwrap_or(SuspendPoint::LATE_UPDATE);
    let late_phase = last_phase.clone();
    let waited_for = heartbeats.clone();
    let program = ProgramBuilder::new()
        .run(|| tracing::info!("Coroutine started"))
        .wait_seconds(0.5)
        .run(|| tracing::info!("Half a second elapsed"))
        .wait_frames(10)
        .run(|| tracing::info!("Ten frames elapsed"))
        .wait_point(last_phase)
        .run(move || tracing::info!(point = %late_phase, "Reached phase"))
        .wait_until(move || waited_for.get() >= 3)
        .run(|| tracing::info!("Heartbeat fired at least three times"))
        .build()?;

    let handle = scheduler
        .start_repeated(program, accumulation_point, repeats)
        .context("Failed to start demo coroutine")?;

    let mut host = HostLoop::new(&scheduler, &config.host)?;
    let frames = match run {
        DemoRun::Offline(max_frames) => {
            let mut stepped = 0;
            while stepped < max_frames && !handle.is_finished() {
                host.step_frame(host.frame_duration());
                stepped += 1;
            }
            stepped
        }
        DemoRun::Realtime(duration) => host.run_realtime(duration).await,
    };

    let finished = handle.is_finished();
    heartbeat.cancel();

    let summary = DemoSummary {
        frames,
        heartbeats: heartbeats.get(),
        finished,
    };
    tracing::info!(
        frames = summary.frames,
        heartbeats = summary.heartbeats,
        finished = summary.finished,
        "Demo complete"
    );

    Ok(summary)
}
