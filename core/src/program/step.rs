//! Program steps and the callables they invoke

use crate::types::SuspendPoint;
use std::fmt;
use std::rc::Rc;

/* ===================== Callables ===================== */

/// Side-effecting callback invoked by a Run step
pub trait Action {
    fn run(&self);
}

impl<F: Fn()> Action for F {
    fn run(&self) {
        self()
    }
}

/// Condition polled by a WaitUntil step
pub trait Predicate {
    fn check(&self) -> bool;
}

impl<F: Fn() -> bool> Predicate for F {
    fn check(&self) -> bool {
        self()
    }
}

/* ===================== Steps ===================== */

/// Tag of a step, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Run,
    WaitSuspensionPoint,
    WaitSeconds,
    WaitFrames,
    WaitUntil,
}

/// One instruction of a program
///
/// Each variant carries exactly the payload its kind needs, so a step without
/// a kind cannot be constructed.
#[derive(Clone)]
pub enum Step {
    /// Invoke the action once and move on
    Run(Rc<dyn Action>),
    /// Wait until the scheduler is ticked at this point
    WaitSuspensionPoint(SuspendPoint),
    /// Wait until this many seconds accrue at the accumulation point
    WaitSeconds(f32),
    /// Wait until this many frames accrue at the accumulation point
    WaitFrames(u32),
    /// Wait until the predicate holds
    WaitUntil(Rc<dyn Predicate>),
}

impl Step {
    pub fn run(action: impl Action + 'static) -> Self {
        Step::Run(Rc::new(action))
    }

    pub fn wait_until(predicate: impl Predicate + 'static) -> Self {
        Step::WaitUntil(Rc::new(predicate))
    }

    pub fn kind(&self) -> StepKind {
        match self {
            Step::Run(_) => StepKind::Run,
            Step::WaitSuspensionPoint(_) => StepKind::WaitSuspensionPoint,
            Step::WaitSeconds(_) => StepKind::WaitSeconds,
            Step::WaitFrames(_) => StepKind::WaitFrames,
            Step::WaitUntil(_) => StepKind::WaitUntil,
        }
    }

    /* ===================== Payload Accessors ===================== */

    // Asking a step for a payload of another kind is a bug in the caller.

    pub fn action(&self) -> &Rc<dyn Action> {
        match self {
            Step::Run(action) => action,
            other => panic!("Step {:?} has no action payload", other.kind()),
        }
    }

    pub fn suspension_point(&self) -> &SuspendPoint {
        match self {
            Step::WaitSuspensionPoint(point) => point,
            other => panic!("Step {:?} has no suspension point payload", other.kind()),
        }
    }

    pub fn seconds_delay(&self) -> f32 {
        match self {
            Step::WaitSeconds(seconds) => *seconds,
            other => panic!("Step {:?} has no seconds payload", other.kind()),
        }
    }

    pub fn frames_delay(&self) -> u32 {
        match self {
            Step::WaitFrames(frames) => *frames,
            other => panic!("Step {:?} has no frames payload", other.kind()),
        }
    }

    pub fn predicate(&self) -> &Rc<dyn Predicate> {
        match self {
            Step::WaitUntil(predicate) => predicate,
            other => panic!("Step {:?} has no predicate payload", other.kind()),
        }
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Run(_) => f.write_str("Run(..)"),
            Step::WaitSuspensionPoint(point) => write!(f, "WaitSuspensionPoint({})", point),
            Step::WaitSeconds(seconds) => write!(f, "WaitSeconds({})", seconds),
            Step::WaitFrames(frames) => write!(f, "WaitFrames({})", frames),
            Step::WaitUntil(_) => f.write_str("WaitUntil(..)"),
        }
    }
}
