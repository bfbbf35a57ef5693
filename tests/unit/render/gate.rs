use super::*;
use crate::foundation::core::Millis;
use crate::page::HeadlessPage;
use crate::runtime::event_loop::Due;

type Clock = EventLoop<(), FrameTask>;

/// Run every frame due up to `until`, feeding draw callbacks to the gate.
fn pump(gate: &mut RenderGate, clock: &mut Clock, page: &mut HeadlessPage, until: u64) {
    while let Some(due) = clock.pop_due(Millis(until)) {
        if let Due::Frame(cbs) = due {
            for (handle, task) in cbs {
                assert_eq!(task, FrameTask::DrawEffect);
                gate.on_frame(handle, clock, page);
            }
        }
    }
}

#[test]
fn pause_before_start_is_harmless() {
    let mut gate = RenderGate::new();
    gate.pause();
    gate.pause();
    assert_eq!(gate.state(), GateState::Idle);
    assert_eq!(gate.pending(), None);
}

#[test]
fn double_resume_schedules_once() {
    let mut clock = Clock::new(16).unwrap();
    let mut gate = RenderGate::new();
    assert!(gate.resume(&mut clock));
    assert!(!gate.resume(&mut clock));
    assert_eq!(clock.pending_frames(), 1);
    assert_eq!(gate.loops_started(), 1);
    assert_eq!(gate.state(), GateState::Running);
}

#[test]
fn running_loop_draws_every_frame() {
    let mut clock = Clock::new(16).unwrap();
    let mut page = HeadlessPage::new();
    let mut gate = RenderGate::new();
    gate.resume(&mut clock);
    pump(&mut gate, &mut clock, &mut page, 16 * 4);
    // frames at 0, 16, 32, 48, 64
    assert_eq!(page.draw_count(), 5);
    assert_eq!(clock.pending_frames(), 1);
}

#[test]
fn pause_drains_within_one_frame() {
    let mut clock = Clock::new(16).unwrap();
    let mut page = HeadlessPage::new();
    let mut gate = RenderGate::new();
    gate.resume(&mut clock);
    pump(&mut gate, &mut clock, &mut page, 16);
    let drawn = page.draw_count();
    gate.pause();
    pump(&mut gate, &mut clock, &mut page, 200);
    assert_eq!(page.draw_count(), drawn);
    assert_eq!(gate.pending(), None);
    assert_eq!(clock.pending_frames(), 0);
}

#[test]
fn pause_then_resume_in_same_frame_keeps_one_loop() {
    let mut clock = Clock::new(16).unwrap();
    let mut page = HeadlessPage::new();
    let mut gate = RenderGate::new();
    gate.resume(&mut clock);
    pump(&mut gate, &mut clock, &mut page, 0);
    gate.pause();
    assert!(!gate.resume(&mut clock));
    assert_eq!(clock.pending_frames(), 1);
    pump(&mut gate, &mut clock, &mut page, 100);
    assert_eq!(gate.loops_started(), 1);
    assert_eq!(clock.pending_frames(), 1);
}

#[test]
fn restart_after_drain_starts_a_new_loop() {
    let mut clock = Clock::new(16).unwrap();
    let mut page = HeadlessPage::new();
    let mut gate = RenderGate::new();
    gate.resume(&mut clock);
    pump(&mut gate, &mut clock, &mut page, 32);
    gate.pause();
    pump(&mut gate, &mut clock, &mut page, 64);
    assert!(gate.resume(&mut clock));
    assert_eq!(gate.loops_started(), 2);
    assert_eq!(clock.pending_frames(), 1);
}

#[test]
fn unavailable_gate_never_schedules() {
    let mut clock = Clock::new(16).unwrap();
    let mut gate = RenderGate::unavailable();
    assert!(!gate.resume(&mut clock));
    assert_eq!(gate.state(), GateState::Unavailable);
    assert_eq!(clock.pending_frames(), 0);
}

#[test]
fn stale_handle_is_ignored() {
    let mut clock = Clock::new(16).unwrap();
    let mut page = HeadlessPage::new();
    let mut gate = RenderGate::new();
    gate.resume(&mut clock);
    assert!(!gate.on_frame(FrameHandle(999), &mut clock, &mut page));
    assert_eq!(page.draw_count(), 0);
    assert!(gate.pending().is_some());
}
