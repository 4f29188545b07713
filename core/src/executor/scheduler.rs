//! Scheduler - registry of live executions and the tick driver
//!
//! The scheduler is an explicitly owned object; hosts create one per
//! subsystem and pass it to whatever needs it. All state is single-threaded
//! and mutated only from `tick` and the control operations.
//!
//! Lookup, pause, resume and cancel scan the registry linearly. Live counts
//! are expected to stay in the tens to low thousands.

use super::execution::{Execution, ExecutionSnapshot, ExecutionState};
use super::handle::Handle;
use crate::config::SchedulerConfig;
use crate::error::SchedulerError;
use crate::program::Program;
use crate::types::{Delta, ExecutionId, Repeats, SuspendPoint};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/* ===================== Registry ===================== */

/// Shared core of a scheduler; handles hold it weakly
pub(crate) struct Registry {
    executions: RefCell<Vec<Rc<Execution>>>,
    config: SchedulerConfig,
    ticking: Cell<bool>,
}

impl Registry {
    fn find(&self, id: ExecutionId) -> Option<Rc<Execution>> {
        self.executions
            .borrow()
            .iter()
            .find(|execution| execution.id() == id)
            .cloned()
    }

    pub(crate) fn contains(&self, id: ExecutionId) -> bool {
        self.executions
            .borrow()
            .iter()
            .any(|execution| execution.id() == id)
    }

    pub(crate) fn is_paused(&self, id: ExecutionId) -> bool {
        self.find(id).is_some_and(|execution| execution.is_paused())
    }

    pub(crate) fn pause(&self, id: ExecutionId) -> bool {
        match self.find(id) {
            Some(execution) => !execution.set_paused(true),
            None => false,
        }
    }

    pub(crate) fn resume(&self, id: ExecutionId) -> bool {
        match self.find(id) {
            Some(execution) => execution.set_paused(false),
            None => false,
        }
    }

    pub(crate) fn cancel(&self, id: ExecutionId) -> bool {
        let removed = {
            let mut executions = self.executions.borrow_mut();
            executions
                .iter()
                .position(|execution| execution.id() == id)
                .map(|index| executions.remove(index))
        };

        match removed {
            Some(execution) => {
                execution.mark_cancelled();
                tracing::debug!(id = %id, "Coroutine cancelled");
                true
            }
            None => false,
        }
    }

    pub(crate) fn snapshot(&self, id: ExecutionId) -> Option<ExecutionSnapshot> {
        self.find(id)?.snapshot()
    }
}

/// Resets the ticking flag even if a callback panics
struct TickGuard<'a>(&'a Cell<bool>);

impl Drop for TickGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/* ===================== Scheduler ===================== */

/// Owns the live executions and advances them once per tick
pub struct Scheduler {
    registry: Rc<Registry>,
}

impl Scheduler {
    /// Create a scheduler with default settings
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        let executions = Vec::with_capacity(config.initial_capacity);

        Scheduler {
            registry: Rc::new(Registry {
                executions: RefCell::new(executions),
                config,
                ticking: Cell::new(false),
            }),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.registry.config
    }

    /* ===================== Creation ===================== */

    /// Run `program` once
    pub fn start_once(
        &self,
        program: Rc<Program>,
        accumulation_point: impl Into<SuspendPoint>,
    ) -> Handle {
        self.start(program, accumulation_point.into(), Repeats::Finite(1))
    }

    /// Run `program` `repeats` times
    ///
    /// Non-positive counts are rejected without registering anything.
    pub fn start_repeated(
        &self,
        program: Rc<Program>,
        accumulation_point: impl Into<SuspendPoint>,
        repeats: i64,
    ) -> Result<Handle, SchedulerError> {
        let count = match u32::try_from(repeats) {
            Ok(count) if count > 0 => count,
            _ => {
                tracing::error!(
                    repeats,
                    "Coroutine must not be dispatched non-positive number of times, call ignored"
                );
                return Err(SchedulerError::InvalidRepeats(repeats));
            }
        };

        Ok(self.start(program, accumulation_point.into(), Repeats::Finite(count)))
    }

    /// Run `program` until cancelled
    pub fn start_looped(
        &self,
        program: Rc<Program>,
        accumulation_point: impl Into<SuspendPoint>,
    ) -> Handle {
        self.start(program, accumulation_point.into(), Repeats::Infinite)
    }

    fn start(
        &self,
        program: Rc<Program>,
        accumulation_point: SuspendPoint,
        repeats: Repeats,
    ) -> Handle {
        let id = ExecutionId::generate();
        let config = &self.registry.config;

        let mut state = ExecutionState::new(program, accumulation_point, repeats);
        state.pass_limit = Some(config.max_looped_passes_per_tick);
        let execution = Rc::new(Execution::new(id, state));

        // Zero-duration steps resolve before the first real tick. A program
        // that already finishes here stays registered until the next tick.
        let finished = execution.advance(&config.initial_point, Delta::ZERO);
        self.registry.executions.borrow_mut().push(execution);

        tracing::debug!(id = %id, repeats = %repeats, finished, "Coroutine started");

        Handle::new(id, Rc::downgrade(&self.registry))
    }

    /* ===================== Tick ===================== */

    /// Advance every live execution at `point`
    ///
    /// Executions run in registration order. Executions started during this
    /// tick are first advanced on the next one; executions cancelled during
    /// this tick are skipped. A negative or non-finite `delta_time` counts
    /// as zero seconds.
    pub fn tick(&self, point: &SuspendPoint, frames: u32, delta_time: f32) {
        let registry = &self.registry;

        if registry.ticking.replace(true) {
            tracing::warn!(point = %point, "Nested tick ignored");
            return;
        }
        let _guard = TickGuard(&registry.ticking);

        let delta_time = if delta_time.is_finite() && delta_time >= 0.0 {
            delta_time
        } else {
            tracing::warn!(point = %point, delta_time, "Invalid tick duration treated as zero");
            0.0
        };
        let delta = Delta::new(delta_time, frames);
        let pass: Vec<Rc<Execution>> = registry.executions.borrow().clone();

        tracing::trace!(point = %point, frames, delta_time, live = pass.len(), "Tick");

        let mut finished = Vec::new();
        for execution in &pass {
            if execution.is_cancelled() {
                continue;
            }

            let _span = tracing::trace_span!("advance", id = %execution.id()).entered();
            if execution.advance(point, delta) {
                finished.push(execution.id());
            }
        }

        if !finished.is_empty() {
            registry
                .executions
                .borrow_mut()
                .retain(|execution| !finished.contains(&execution.id()));

            for id in &finished {
                tracing::debug!(id = %id, "Coroutine finished");
            }
        }
    }

    /* ===================== Queries & Control ===================== */

    /// True when no live execution has the handle's id
    pub fn is_finished(&self, handle: &Handle) -> bool {
        !self.registry.contains(handle.id())
    }

    /// False when not found
    pub fn is_paused(&self, handle: &Handle) -> bool {
        self.registry.is_paused(handle.id())
    }

    /// Pause the execution; true only if it was running before
    pub fn pause(&self, handle: &Handle) -> bool {
        self.registry.pause(handle.id())
    }

    /// Resume the execution; true only if it was paused before
    pub fn resume(&self, handle: &Handle) -> bool {
        self.registry.resume(handle.id())
    }

    /// Remove the execution immediately and detach the handle
    pub fn cancel(&self, handle: &mut Handle) -> bool {
        let cancelled = self.registry.cancel(handle.id());
        if cancelled {
            handle.detach();
        }
        cancelled
    }

    /// Remove every live execution, returning how many were removed
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<Rc<Execution>> =
            self.registry.executions.borrow_mut().drain(..).collect();
        for execution in &drained {
            execution.mark_cancelled();
        }
        drained.len()
    }

    pub fn snapshot(&self, handle: &Handle) -> Option<ExecutionSnapshot> {
        self.registry.snapshot(handle.id())
    }

    /// Number of live executions
    pub fn len(&self) -> usize {
        self.registry.executions.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("live", &self.len())
            .field("config", &self.registry.config)
            .finish()
    }
}
