//! Execution state
//!
//! An execution is one running instance of a program. `ExecutionState` is the
//! pure interpreter: no registry, no handles, it just runs steps until one
//! blocks or the repeat budget runs out. `Execution` wraps it with the
//! identity and flags the scheduler and handles touch from outside.

use super::steps::{try_make_step, StepResult};
use crate::program::Program;
use crate::types::{Delta, ExecutionId, Repeats, SuspendPoint};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/* ===================== Interpreter State ===================== */

/// Mutable run state of one execution
#[derive(Debug)]
pub struct ExecutionState {
    /// Shared, immutable step sequence
    pub program: Rc<Program>,

    /// The only point at which timed waits accrue progress
    pub accumulation_point: SuspendPoint,

    /// Next step to attempt
    pub step_index: usize,

    /// Progress collected by the current timed wait, including carried surplus
    pub accumulator: Delta,

    /// Passes left, including the current one
    pub repeats: Repeats,

    /// Set once the repeat budget is exhausted
    pub finished: bool,

    /// Upper bound on passes per call for looped executions
    pub pass_limit: Option<u32>,
}

impl ExecutionState {
    pub fn new(program: Rc<Program>, accumulation_point: SuspendPoint, repeats: Repeats) -> Self {
        assert!(
            !program.is_empty(),
            "Coroutines must have at least one step"
        );
        assert!(
            !repeats.is_exhausted(),
            "Coroutines must have at least one repeat"
        );

        ExecutionState {
            program,
            accumulation_point,
            step_index: 0,
            accumulator: Delta::ZERO,
            repeats,
            finished: false,
            pass_limit: None,
        }
    }

    /// Make as much progress as possible at `point`
    ///
    /// Returns true once every repeat has completed. Several passes may run in
    /// one call when all of their steps resolve instantly.
    pub fn advance(&mut self, point: &SuspendPoint, delta: Delta) -> bool {
        self.advance_unless(point, delta, &Cell::new(false))
    }

    /// Like `advance`, but stops as soon as `cancelled` is raised by a callback
    ///
    /// A cancelled execution never reports finished; it is already gone from
    /// the registry.
    pub(crate) fn advance_unless(
        &mut self,
        point: &SuspendPoint,
        delta: Delta,
        cancelled: &Cell<bool>,
    ) -> bool {
        if self.finished {
            return true;
        }

        let mut delta = delta;
        let accumulating = *point == self.accumulation_point;
        let mut passes = 0u32;

        loop {
            while self.step_index < self.program.len() {
                let step = &self.program[self.step_index];

                match try_make_step(step, point, accumulating, &mut delta, &mut self.accumulator) {
                    StepResult::Continue => self.step_index += 1,
                    StepResult::Blocked => return false,
                }

                if cancelled.get() {
                    return false;
                }
            }

            // Pass complete
            self.step_index = 0;

            match &mut self.repeats {
                Repeats::Finite(remaining) => {
                    *remaining -= 1;
                    if *remaining == 0 {
                        self.finished = true;
                        return true;
                    }
                }
                Repeats::Infinite => {
                    passes += 1;
                    if self.pass_limit.is_some_and(|limit| passes >= limit) {
                        tracing::warn!(
                            passes,
                            "Looped coroutine never blocked, yielding until the next tick"
                        );
                        return false;
                    }
                }
            }
        }
    }
}

/* ===================== Registered Execution ===================== */

/// An execution as held by the scheduler registry
///
/// The flags live outside the interpreter state so that callbacks running
/// inside `advance` can still pause or cancel the execution through a handle.
#[derive(Debug)]
pub struct Execution {
    id: ExecutionId,
    paused: Cell<bool>,
    cancelled: Cell<bool>,
    state: RefCell<ExecutionState>,
}

impl Execution {
    pub fn new(id: ExecutionId, state: ExecutionState) -> Self {
        Execution {
            id,
            paused: Cell::new(false),
            cancelled: Cell::new(false),
            state: RefCell::new(state),
        }
    }

    pub fn id(&self) -> ExecutionId {
        self.id
    }

    /// Advance unless paused or cancelled; returns true when finished
    pub fn advance(&self, point: &SuspendPoint, delta: Delta) -> bool {
        let mut state = self.state.borrow_mut();

        // Finished executions are reaped even when paused
        if state.finished {
            return true;
        }

        if self.paused.get() || self.cancelled.get() {
            return false;
        }

        state.advance_unless(point, delta, &self.cancelled)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.get()
    }

    /// Set the paused flag, returning the previous value
    pub fn set_paused(&self, paused: bool) -> bool {
        self.paused.replace(paused)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    pub(crate) fn mark_cancelled(&self) {
        self.cancelled.set(true);
    }

    /// Copy of the current progress
    ///
    /// None while the execution is inside its own `advance`.
    pub fn snapshot(&self) -> Option<ExecutionSnapshot> {
        let state = self.state.try_borrow().ok()?;

        Some(ExecutionSnapshot {
            id: self.id,
            step_index: state.step_index,
            step_count: state.program.len(),
            accumulator: state.accumulator,
            repeats: state.repeats,
            accumulation_point: state.accumulation_point.clone(),
            paused: self.paused.get(),
            finished: state.finished,
        })
    }
}

/* ===================== Snapshot ===================== */

/// Serializable view of an execution's progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionSnapshot {
    pub id: ExecutionId,
    pub step_index: usize,
    pub step_count: usize,
    pub accumulator: Delta,
    pub repeats: Repeats,
    pub accumulation_point: SuspendPoint,
    pub paused: bool,
    pub finished: bool,
}
