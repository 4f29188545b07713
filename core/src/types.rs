//! Shared value types for the scheduler
//!
//! - SuspendPoint: host-defined phase tag
//! - Delta: progress reported by one tick
//! - ExecutionId: unique identifier of a running program
//! - Repeats: remaining repeat budget

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use uuid::Uuid;

/* ===================== Suspension Points ===================== */

/// A named phase of the host loop at which the scheduler may be advanced
///
/// The set of points and their meaning belong to the host. The constants
/// below cover the phases of a typical game loop; hosts are free to define
/// their own with `SuspendPoint::new`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuspendPoint(Cow<'static, str>);

impl SuspendPoint {
    pub const FIXED_UPDATE: SuspendPoint = SuspendPoint(Cow::Borrowed("FixedUpdate"));
    pub const UPDATE: SuspendPoint = SuspendPoint(Cow::Borrowed("Update"));
    pub const LATE_UPDATE: SuspendPoint = SuspendPoint(Cow::Borrowed("LateUpdate"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        SuspendPoint(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SuspendPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for SuspendPoint {
    fn from(name: &'static str) -> Self {
        SuspendPoint(Cow::Borrowed(name))
    }
}

impl From<String> for SuspendPoint {
    fn from(name: String) -> Self {
        SuspendPoint(Cow::Owned(name))
    }
}

/* ===================== Delta ===================== */

/// Progress since the previous tick: elapsed seconds and elapsed frames
///
/// Also used as the per-execution accumulator while waiting on
/// WaitSeconds / WaitFrames steps.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Delta {
    pub seconds: f32,
    pub frames: u32,
}

impl Delta {
    pub const ZERO: Delta = Delta {
        seconds: 0.0,
        frames: 0,
    };

    pub fn new(seconds: f32, frames: u32) -> Self {
        Delta { seconds, frames }
    }
}

/* ===================== Identifiers ===================== */

/// Unique identifier of an execution, never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionId(Uuid);

impl ExecutionId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        ExecutionId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/* ===================== Repeat Budget ===================== */

/// Number of passes an execution has left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t", content = "v")]
pub enum Repeats {
    Finite(u32),
    Infinite,
}

impl Repeats {
    pub fn is_infinite(&self) -> bool {
        matches!(self, Repeats::Infinite)
    }

    /// True once a finite budget has been used up
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Repeats::Finite(0))
    }
}

impl fmt::Display for Repeats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repeats::Finite(n) => write!(f, "{}", n),
            Repeats::Infinite => f.write_str("infinite"),
        }
    }
}
