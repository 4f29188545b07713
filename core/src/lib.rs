pub mod benchmark;
pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod host;
pub mod program;
pub mod types;

// Re-export main types
pub use error::{ProgramError, SchedulerError};
pub use executor::{ExecutionSnapshot, Handle, Scheduler};
pub use program::{Program, ProgramBuilder, Step, StepKind};
pub use types::*;
