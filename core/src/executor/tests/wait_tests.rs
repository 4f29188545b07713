//! Tests for WaitSuspensionPoint, WaitSeconds, WaitFrames and WaitUntil

use super::helpers::{state_at_update, tick_update, Counter, Flag, Recorder};
use crate::executor::Scheduler;
use crate::program::ProgramBuilder;
use crate::types::{Delta, Repeats, SuspendPoint};

/* ===================== WaitSeconds ===================== */

#[test]
fn test_wait_seconds_carries_surplus() {
    let program = ProgramBuilder::new()
        .wait_seconds(2.0)
        .wait_seconds(1.0)
        .build()
        .unwrap();
    let mut state = state_at_update(program, Repeats::Finite(1));

    assert!(!state.advance(&SuspendPoint::UPDATE, Delta::new(1.25, 1)));
    assert_eq!(state.step_index, 0);
    assert_eq!(state.accumulator.seconds, 1.25);

    // 2.25 collected: first wait done, 0.25 carried into the second
    assert!(!state.advance(&SuspendPoint::UPDATE, Delta::new(1.0, 1)));
    assert_eq!(state.step_index, 1);
    assert_eq!(state.accumulator.seconds, 0.25);

    assert!(state.advance(&SuspendPoint::UPDATE, Delta::new(0.75, 1)));
}

#[test]
fn test_wait_seconds_surplus_from_uneven_ticks() {
    let program = ProgramBuilder::new().wait_seconds(2.0).wait_frames(100).build().unwrap();
    let mut state = state_at_update(program, Repeats::Finite(1));

    state.advance(&SuspendPoint::UPDATE, Delta::new(1.2, 0));
    assert_eq!(state.step_index, 0);

    state.advance(&SuspendPoint::UPDATE, Delta::new(1.0, 0));
    assert_eq!(state.step_index, 1);
    assert!((state.accumulator.seconds - 0.2).abs() < 1e-5);
}

#[test]
fn test_wait_seconds_ignores_other_points() {
    let scheduler = Scheduler::new();
    let counter = Counter::new();
    let program = ProgramBuilder::new()
        .wait_seconds(1.0)
        .run(counter.action())
        .build()
        .unwrap();
    let handle = scheduler.start_once(program, SuspendPoint::UPDATE);

    for _ in 0..10 {
        scheduler.tick(&SuspendPoint::LATE_UPDATE, 1, 5.0);
    }

    let snapshot = handle.snapshot().unwrap();
    assert_eq!(snapshot.step_index, 0);
    assert_eq!(snapshot.accumulator, Delta::ZERO);
    assert_eq!(counter.get(), 0);

    // Finishing during a regular tick reaps in that same tick
    tick_update(&scheduler, 1, 1.0);
    assert_eq!(counter.get(), 1);
    assert!(handle.is_finished());
}

#[test]
fn test_invalid_tick_duration_counts_as_zero() {
    let scheduler = Scheduler::new();
    let counter = Counter::new();
    let program = ProgramBuilder::new()
        .wait_seconds(1.0)
        .run(counter.action())
        .build()
        .unwrap();
    let handle = scheduler.start_once(program, SuspendPoint::UPDATE);

    tick_update(&scheduler, 1, f32::NAN);
    tick_update(&scheduler, 1, -2.0);
    tick_update(&scheduler, 1, f32::INFINITY);

    assert_eq!(handle.snapshot().unwrap().accumulator.seconds, 0.0);
    assert_eq!(counter.get(), 0);

    tick_update(&scheduler, 1, 0.5);
    assert_eq!(counter.get(), 0);
    tick_update(&scheduler, 1, 0.5);
    assert_eq!(counter.get(), 1);
}

#[test]
fn test_one_tick_delta_is_consumed_once() {
    // Two back-to-back waits cannot both be satisfied by the same tick
    let program = ProgramBuilder::new()
        .wait_seconds(1.0)
        .wait_seconds(1.0)
        .build()
        .unwrap();
    let mut state = state_at_update(program, Repeats::Finite(1));

    assert!(!state.advance(&SuspendPoint::UPDATE, Delta::new(1.0, 0)));
    assert_eq!(state.step_index, 1);
    assert_eq!(state.accumulator.seconds, 0.0);
}

#[test]
fn test_large_delta_satisfies_consecutive_waits_through_carry() {
    let program = ProgramBuilder::new()
        .wait_seconds(1.0)
        .wait_seconds(1.0)
        .build()
        .unwrap();
    let mut state = state_at_update(program, Repeats::Finite(1));

    // Surplus from the first wait already covers the second
    assert!(state.advance(&SuspendPoint::UPDATE, Delta::new(2.5, 0)));
    assert_eq!(state.accumulator.seconds, 0.5);
}

#[test]
fn test_zero_second_wait_completes_at_accumulation_point() {
    let program = ProgramBuilder::new().wait_seconds(0.0).build().unwrap();

    let mut at_update = state_at_update(program.clone(), Repeats::Finite(1));
    assert!(at_update.advance(&SuspendPoint::UPDATE, Delta::ZERO));

    let mut elsewhere = state_at_update(program, Repeats::Finite(1));
    assert!(!elsewhere.advance(&SuspendPoint::LATE_UPDATE, Delta::ZERO));
}

/* ===================== WaitFrames ===================== */

#[test]
fn test_wait_frames_counts_frames_independently_of_time() {
    let program = ProgramBuilder::new()
        .wait_seconds(0.5)
        .wait_frames(2)
        .build()
        .unwrap();
    let mut state = state_at_update(program, Repeats::Finite(1));

    // Seconds satisfy the first wait, the same tick's frame still counts for the second
    assert!(!state.advance(&SuspendPoint::UPDATE, Delta::new(0.5, 1)));
    assert_eq!(state.step_index, 1);
    assert_eq!(state.accumulator.frames, 1);

    assert!(state.advance(&SuspendPoint::UPDATE, Delta::new(0.0, 1)));
    assert_eq!(state.accumulator.frames, 0);
}

#[test]
fn test_wait_frames_carries_surplus() {
    let program = ProgramBuilder::new().wait_frames(2).wait_frames(3).build().unwrap();
    let mut state = state_at_update(program, Repeats::Finite(1));

    assert!(!state.advance(&SuspendPoint::UPDATE, Delta::new(0.0, 4)));
    assert_eq!(state.step_index, 1);
    assert_eq!(state.accumulator.frames, 2);

    assert!(state.advance(&SuspendPoint::UPDATE, Delta::new(0.0, 1)));
}

/* ===================== WaitSuspensionPoint ===================== */

#[test]
fn test_wait_point_blocks_until_matching_tick() {
    let scheduler = Scheduler::new();
    let recorder = Recorder::new();
    let program = ProgramBuilder::new()
        .wait_point(SuspendPoint::LATE_UPDATE)
        .run(recorder.action("late"))
        .build()
        .unwrap();
    let handle = scheduler.start_once(program, SuspendPoint::UPDATE);

    tick_update(&scheduler, 1, 1.0);
    scheduler.tick(&SuspendPoint::FIXED_UPDATE, 1, 1.0);
    assert!(recorder.entries().is_empty());

    scheduler.tick(&SuspendPoint::LATE_UPDATE, 1, 1.0);
    assert_eq!(recorder.entries(), vec!["late"]);
    assert!(handle.is_finished());
}

#[test]
fn test_custom_host_points() {
    let scheduler = Scheduler::new();
    let counter = Counter::new();
    let physics = SuspendPoint::new("PrePhysics");
    let program = ProgramBuilder::new()
        .wait_point(physics.clone())
        .run(counter.action())
        .wait_frames(2)
        .build()
        .unwrap();
    let handle = scheduler.start_once(program, physics.clone());

    scheduler.tick(&physics, 1, 0.0);
    assert_eq!(counter.get(), 1);
    assert!(!handle.is_finished());

    scheduler.tick(&physics, 1, 0.0);
    assert!(handle.is_finished());
}

/* ===================== WaitUntil ===================== */

#[test]
fn test_wait_until_polls_predicate_each_tick() {
    let scheduler = Scheduler::new();
    let counter = Counter::new();
    let flag = Flag::new();
    let program = ProgramBuilder::new()
        .wait_until(flag.predicate())
        .run(counter.action())
        .build()
        .unwrap();
    let handle = scheduler.start_once(program, SuspendPoint::UPDATE);

    for _ in 0..5 {
        scheduler.tick(&SuspendPoint::LATE_UPDATE, 1, 0.1);
    }
    assert_eq!(counter.get(), 0);
    assert_eq!(handle.snapshot().unwrap().step_index, 0);

    flag.set(true);
    // Predicates do not depend on the accumulation point
    scheduler.tick(&SuspendPoint::LATE_UPDATE, 1, 0.1);
    assert_eq!(counter.get(), 1);
    assert!(handle.is_finished());
}

#[test]
fn test_never_satisfied_predicate_runs_until_cancelled() {
    let scheduler = Scheduler::new();
    let flag = Flag::new();
    let program = ProgramBuilder::new().wait_until(flag.predicate()).build().unwrap();
    let mut handle = scheduler.start_once(program, SuspendPoint::UPDATE);

    for _ in 0..100 {
        tick_update(&scheduler, 1, 1.0);
    }
    assert!(!handle.is_finished());

    assert!(handle.cancel());
    assert!(handle.is_finished());
}
