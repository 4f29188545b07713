//! Coroutine programs
//!
//! A program is an immutable, non-empty sequence of steps. It is authored
//! once (usually through `ProgramBuilder`) and shared read-only by every
//! execution that runs it.

pub mod builder;
pub mod step;

pub use builder::ProgramBuilder;
pub use step::{Action, Predicate, Step, StepKind};

use crate::error::ProgramError;
use std::ops::Index;
use std::rc::Rc;

/// Validated, immutable step sequence
#[derive(Debug)]
pub struct Program {
    steps: Vec<Step>,
}

impl Program {
    /// Validate `steps` and wrap them for sharing between executions
    pub fn new(steps: Vec<Step>) -> Result<Rc<Self>, ProgramError> {
        if steps.is_empty() {
            return Err(ProgramError::Empty);
        }

        for (index, step) in steps.iter().enumerate() {
            if let Step::WaitSeconds(value) = step {
                if !value.is_finite() || *value < 0.0 {
                    return Err(ProgramError::InvalidSecondsDelay {
                        index,
                        value: *value,
                    });
                }
            }
        }

        Ok(Rc::new(Program { steps }))
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false for a constructed program; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Index<usize> for Program {
    type Output = Step;

    fn index(&self, index: usize) -> &Step {
        &self.steps[index]
    }
}
