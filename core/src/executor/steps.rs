//! Step handlers
//!
//! Each step kind has its own handler deciding whether the step completes
//! within the current tick. Handlers never block: a step that cannot complete
//! yet reports `StepResult::Blocked` and is retried on a later tick.

use crate::program::Step;
use crate::types::{Delta, SuspendPoint};

/// Result of attempting one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// Step completed, move to the next one
    Continue,
    /// Step cannot complete during this tick
    Blocked,
}

impl From<bool> for StepResult {
    fn from(completed: bool) -> Self {
        if completed {
            StepResult::Continue
        } else {
            StepResult::Blocked
        }
    }
}

/* ===================== Dispatcher ===================== */

/// Attempt a single step
///
/// `delta` is the unconsumed remainder of this tick's progress; wait handlers
/// move it into `accumulator` so one tick is never counted twice.
pub fn try_make_step(
    step: &Step,
    point: &SuspendPoint,
    accumulating: bool,
    delta: &mut Delta,
    accumulator: &mut Delta,
) -> StepResult {
    match step {
        Step::Run(action) => {
            action.run();
            StepResult::Continue
        }

        Step::WaitSuspensionPoint(expected) => (expected == point).into(),

        Step::WaitSeconds(seconds) => wait_seconds(*seconds, accumulating, delta, accumulator),

        Step::WaitFrames(frames) => wait_frames(*frames, accumulating, delta, accumulator),

        Step::WaitUntil(predicate) => predicate.check().into(),
    }
}

/* ===================== Wait Handlers ===================== */

/// Accrue seconds and complete once `seconds` have been collected
///
/// Surplus stays in the accumulator for the next timed step.
pub fn wait_seconds(
    seconds: f32,
    accumulating: bool,
    delta: &mut Delta,
    accumulator: &mut Delta,
) -> StepResult {
    if !accumulating {
        return StepResult::Blocked;
    }

    accumulator.seconds += delta.seconds;
    delta.seconds = 0.0;

    if seconds > accumulator.seconds {
        return StepResult::Blocked;
    }

    accumulator.seconds -= seconds;
    StepResult::Continue
}

/// Accrue frames and complete once `frames` have been collected
pub fn wait_frames(
    frames: u32,
    accumulating: bool,
    delta: &mut Delta,
    accumulator: &mut Delta,
) -> StepResult {
    if !accumulating {
        return StepResult::Blocked;
    }

    accumulator.frames = accumulator.frames.saturating_add(delta.frames);
    delta.frames = 0;

    if frames > accumulator.frames {
        return StepResult::Blocked;
    }

    accumulator.frames -= frames;
    StepResult::Continue
}
