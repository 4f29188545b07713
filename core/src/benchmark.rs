use anyhow::{bail, Context, Result};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use crate::config::Config;
use crate::executor::Scheduler;
use crate::host::HostLoop;
use crate::program::ProgramBuilder;

pub struct BenchmarkParams {
    pub executions: usize,
    pub frames: u64,
}

#[derive(Debug)]
pub struct BenchmarkReport {
    pub executions: usize,
    pub frames: u64,
    pub ticks: u64,
    pub actions_run: u64,
    pub elapsed_ms: f64,
}

impl BenchmarkReport {
    pub fn ticks_per_sec(&self) -> f64 {
        per_second(self.ticks, self.elapsed_ms)
    }

    pub fn advances_per_sec(&self) -> f64 {
        per_second(self.ticks * self.executions as u64, self.elapsed_ms)
    }
}

fn per_second(count: u64, elapsed_ms: f64) -> f64 {
    if elapsed_ms <= 0.0 {
        return 0.0;
    }
    count as f64 / (elapsed_ms / 1000.0)
}

/// Measure tick throughput with `executions` looped coroutines
///
/// Each coroutine waits a frame, runs a counter, waits a point and a short
/// delay, so every tick exercises every step kind.
pub fn run_benchmark(config: &Config, params: BenchmarkParams) -> Result<BenchmarkReport> {
    if params.executions == 0 {
        bail!("Benchmark needs at least one execution");
    }
    if params.frames == 0 {
        bail!("Benchmark needs at least one frame");
    }

    println!("🚀 Starting Cadence Benchmark");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("\n📋 Configuration:");
    println!("   Executions: {}", params.executions);
    println!("   Frames: {}", params.frames);
    println!("   Frame Rate: {}/sec", config.host.frame_rate);
    println!("   Phases: {}", config.host.phases.len());

    let scheduler = Scheduler::with_config(config.scheduler.clone());
    let actions_run = Rc::new(Cell::new(0u64));

    let last_phase = config
        .host
        .phases
        .last()
        .cloned()
        .context("Benchmark needs at least one host phase")?;

    let counter = actions_run.clone();
    let program = ProgramBuilder::new()
        .wait_frames(1)
        .run(move || counter.set(counter.get() + 1))
        .wait_point(last_phase)
        .wait_seconds(0.05)
        .build()?;

    for _ in 0..params.executions {
        scheduler.start_looped(program.clone(), config.host.accumulation_point.clone());
    }

    let mut host = HostLoop::new(&scheduler, &config.host)?;
    let start = Instant::now();
    host.run_frames(params.frames);
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    let cancelled = scheduler.cancel_all();
    debug_assert_eq!(cancelled, params.executions);

    let report = BenchmarkReport {
        executions: params.executions,
        frames: params.frames,
        ticks: params.frames * config.host.phases.len() as u64,
        actions_run: actions_run.get(),
        elapsed_ms,
    };

    println!("\n📊 Results:");
    println!("   Duration: {:.2}ms", report.elapsed_ms);
    println!("   Ticks: {} ({:.0}/sec)", report.ticks, report.ticks_per_sec());
    println!("   Advances: {:.0}/sec", report.advances_per_sec());
    println!("   Actions Run: {}", report.actions_run);

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_benchmark_counts_ticks_and_actions() {
        let config = Config::default();
        let report = run_benchmark(
            &config,
            BenchmarkParams {
                executions: 4,
                frames: 10,
            },
        )
        .unwrap();

        assert_eq!(report.ticks, 30);
        assert!(report.actions_run > 0);
        assert!(report.actions_run <= 40);
    }

    #[test]
    fn test_benchmark_rejects_empty_run() {
        let config = Config::default();
        let result = run_benchmark(
            &config,
            BenchmarkParams {
                executions: 0,
                frames: 10,
            },
        );
        assert!(result.is_err());
    }
}
