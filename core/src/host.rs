//! Reference host loop
//!
//! Drives a scheduler the way an engine frame loop would: every frame ticks
//! each configured phase in order, reporting one elapsed frame and the frame's
//! duration. Offline stepping is deterministic; realtime mode measures the
//! real elapsed time between frames.

use anyhow::{bail, Result};
use std::time::{Duration, Instant};
use tokio::time::{interval, MissedTickBehavior};

use crate::config::HostConfig;
use crate::executor::Scheduler;
use crate::types::SuspendPoint;

pub struct HostLoop<'a> {
    scheduler: &'a Scheduler,
    phases: Vec<SuspendPoint>,
    frame_rate: u32,
    frame: u64,
}

impl<'a> HostLoop<'a> {
    pub fn new(scheduler: &'a Scheduler, config: &HostConfig) -> Result<Self> {
        if config.frame_rate == 0 {
            bail!("Host loop needs a positive frame rate");
        }
        if config.phases.is_empty() {
            bail!("Host loop needs at least one phase");
        }

        Ok(HostLoop {
            scheduler,
            phases: config.phases.clone(),
            frame_rate: config.frame_rate,
            frame: 0,
        })
    }

    /// Frames stepped so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Fixed frame duration used by offline stepping
    pub fn frame_duration(&self) -> f32 {
        1.0 / self.frame_rate as f32
    }

    /// Tick every phase once
    pub fn step_frame(&mut self, delta_time: f32) {
        for phase in &self.phases {
            self.scheduler.tick(phase, 1, delta_time);
        }
        self.frame += 1;
    }

    /// Step `frames` frames at the fixed frame duration
    pub fn run_frames(&mut self, frames: u64) {
        let delta_time = self.frame_duration();
        for _ in 0..frames {
            self.step_frame(delta_time);
        }
    }

    /// Step until the scheduler is empty or `max_frames` have run
    ///
    /// Returns the number of frames stepped.
    pub fn run_until_idle(&mut self, max_frames: u64) -> u64 {
        let delta_time = self.frame_duration();
        let mut stepped = 0;

        while stepped < max_frames && !self.scheduler.is_empty() {
            self.step_frame(delta_time);
            stepped += 1;
        }

        stepped
    }

    /// Run at the configured frame rate for `duration` of wall-clock time
    ///
    /// Each frame reports the real time elapsed since the previous frame.
    /// Returns the number of frames stepped.
    pub async fn run_realtime(&mut self, duration: Duration) -> u64 {
        let period = Duration::from_secs_f64(1.0 / f64::from(self.frame_rate));
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let start = Instant::now();
        let mut last = start;
        let mut stepped = 0;

        // First tick completes immediately
        ticker.tick().await;

        while start.elapsed() < duration {
            ticker.tick().await;

            let now = Instant::now();
            let delta_time = now.duration_since(last).as_secs_f32();
            last = now;

            self.step_frame(delta_time);
            stepped += 1;
        }

        tracing::debug!(
            frames = stepped,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Realtime run complete"
        );
        stepped
    }
}
