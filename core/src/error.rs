//! Error types for program authoring and scheduling
//!
//! Only recoverable input errors live here. Malformed programs that slip past
//! validation are invariant violations and panic instead.

use thiserror::Error;

/// Rejected while assembling a program
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProgramError {
    #[error("program must contain at least one step")]
    Empty,

    #[error("seconds delay at step {index} must be finite and non-negative, got {value}")]
    InvalidSecondsDelay { index: usize, value: f32 },
}

/// Rejected by a scheduler entry point
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("coroutine repeat count must be positive and fit in 32 bits (requested {0})")]
    InvalidRepeats(i64),
}
