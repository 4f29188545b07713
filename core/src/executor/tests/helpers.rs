//! Test helpers for executor tests
//!
//! Counters and recorders that programs can share with the test body

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::executor::{ExecutionState, Scheduler};
use crate::program::{Program, ProgramBuilder};
use crate::types::{Repeats, SuspendPoint};

/// Shared counter incremented by a Run step
#[derive(Clone, Default)]
pub struct Counter(Rc<Cell<u32>>);

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> u32 {
        self.0.get()
    }

    /// Action closure incrementing this counter
    pub fn action(&self) -> impl Fn() + 'static {
        let cell = self.0.clone();
        move || cell.set(cell.get() + 1)
    }
}

/// Shared log of labels pushed by Run steps
#[derive(Clone, Default)]
pub struct Recorder(Rc<RefCell<Vec<&'static str>>>);

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<&'static str> {
        self.0.borrow().clone()
    }

    pub fn action(&self, label: &'static str) -> impl Fn() + 'static {
        let log = self.0.clone();
        move || log.borrow_mut().push(label)
    }
}

/// Predicate flag flipped by the test
#[derive(Clone, Default)]
pub struct Flag(Rc<Cell<bool>>);

impl Flag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, value: bool) {
        self.0.set(value);
    }

    pub fn predicate(&self) -> impl Fn() -> bool + 'static {
        let cell = self.0.clone();
        move || cell.get()
    }
}

/// Program with `count` Run steps all incrementing `counter`
pub fn run_only_program(counter: &Counter, count: usize) -> Rc<Program> {
    (0..count)
        .fold(ProgramBuilder::new(), |builder, _| builder.run(counter.action()))
        .build()
        .expect("Program build failed")
}

/// Bare interpreter state accumulating at Update
pub fn state_at_update(program: Rc<Program>, repeats: Repeats) -> ExecutionState {
    ExecutionState::new(program, SuspendPoint::UPDATE, repeats)
}

/// Tick `scheduler` at Update
pub fn tick_update(scheduler: &Scheduler, frames: u32, seconds: f32) {
    scheduler.tick(&SuspendPoint::UPDATE, frames, seconds);
}
