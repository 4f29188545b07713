//! Fluent authoring of coroutine programs
//!
//! # Example
//!
//! ```rust
//! use cadence_core::program::ProgramBuilder;
//! use cadence_core::types::SuspendPoint;
//!
//! let program = ProgramBuilder::new()
//!     .run(|| println!("spawned"))
//!     .wait_seconds(1.5)
//!     .wait_point(SuspendPoint::LATE_UPDATE)
//!     .wait_frames(2)
//!     .run(|| println!("done"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(program.len(), 5);
//! ```

use super::step::{Action, Predicate, Step};
use super::Program;
use crate::error::ProgramError;
use crate::types::SuspendPoint;
use std::rc::Rc;

/// Builder for constructing a Program
#[derive(Default)]
pub struct ProgramBuilder {
    steps: Vec<Step>,
}

impl ProgramBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a Run step
    pub fn run(mut self, action: impl Action + 'static) -> Self {
        self.steps.push(Step::run(action));
        self
    }

    /// Append a step waiting for the given suspension point
    pub fn wait_point(mut self, point: impl Into<SuspendPoint>) -> Self {
        self.steps.push(Step::WaitSuspensionPoint(point.into()));
        self
    }

    /// Append a step waiting for accumulated seconds
    pub fn wait_seconds(mut self, seconds: f32) -> Self {
        self.steps.push(Step::WaitSeconds(seconds));
        self
    }

    /// Append a step waiting for accumulated frames
    pub fn wait_frames(mut self, frames: u32) -> Self {
        self.steps.push(Step::WaitFrames(frames));
        self
    }

    /// Append a step waiting for the predicate to hold
    pub fn wait_until(mut self, predicate: impl Predicate + 'static) -> Self {
        self.steps.push(Step::wait_until(predicate));
        self
    }

    /// Append an already constructed step
    pub fn then(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Validate and freeze the program
    pub fn build(self) -> Result<Rc<Program>, ProgramError> {
        Program::new(self.steps)
    }
}
