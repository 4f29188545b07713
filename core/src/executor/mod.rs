//! # Executor - Cooperative Coroutine Scheduler
//!
//! Runs coroutine programs incrementally across host-loop ticks.
//!
//! ## Core Principles
//!
//! 1. **Step-level suspension**: Executions only stop between whole steps, never mid-callback
//! 2. **Host-driven progress**: Time and frames advance only through `Scheduler::tick`
//! 3. **Carry, don't reset**: Timed waits keep surplus progress for the next wait
//! 4. **Handles are weak**: Control goes through ids, so a stale handle is always safe

pub mod execution;
pub mod handle;
pub mod scheduler;
pub mod steps;

#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use execution::{Execution, ExecutionSnapshot, ExecutionState};
pub use handle::Handle;
pub use scheduler::Scheduler;
pub use steps::{try_make_step, StepResult};
