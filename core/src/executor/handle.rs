//! Handles - external references to executions
//!
//! A handle pairs the execution id with a weak reference to the scheduler that
//! owns it. It never keeps the scheduler alive and stays safe to use after the
//! execution is gone: queries report "not found" and control calls return false.

use super::execution::ExecutionSnapshot;
use super::scheduler::Registry;
use crate::types::ExecutionId;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone)]
pub struct Handle {
    id: ExecutionId,
    scheduler: Option<Weak<Registry>>,
}

impl Handle {
    pub(crate) fn new(id: ExecutionId, scheduler: Weak<Registry>) -> Self {
        Handle {
            id,
            scheduler: Some(scheduler),
        }
    }

    pub fn id(&self) -> ExecutionId {
        self.id
    }

    /// False after cancellation through this handle or once the scheduler is dropped
    pub fn is_attached(&self) -> bool {
        self.registry().is_some()
    }

    pub(crate) fn detach(&mut self) {
        self.scheduler = None;
    }

    fn registry(&self) -> Option<Rc<Registry>> {
        self.scheduler.as_ref().and_then(Weak::upgrade)
    }

    /* ===================== Delegated Operations ===================== */

    pub fn is_finished(&self) -> bool {
        self.registry()
            .map_or(true, |registry| !registry.contains(self.id))
    }

    pub fn is_paused(&self) -> bool {
        self.registry()
            .is_some_and(|registry| registry.is_paused(self.id))
    }

    pub fn pause(&self) -> bool {
        self.registry()
            .is_some_and(|registry| registry.pause(self.id))
    }

    pub fn resume(&self) -> bool {
        self.registry()
            .is_some_and(|registry| registry.resume(self.id))
    }

    /// Cancel the execution and drop the back-reference
    pub fn cancel(&mut self) -> bool {
        let cancelled = self
            .registry()
            .is_some_and(|registry| registry.cancel(self.id));
        if cancelled {
            self.detach();
        }
        cancelled
    }

    pub fn snapshot(&self) -> Option<ExecutionSnapshot> {
        self.registry()?.snapshot(self.id)
    }
}
