use crate::page::Page;
use crate::runtime::FrameTask;
use crate::runtime::event_loop::{EventLoop, FrameHandle};

/// Observable state of the background-effect loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    /// The drawing context could not be acquired; the loop never runs.
    Unavailable,
    /// Not drawing. A draw callback may still be in flight and will drain.
    Idle,
    /// Drawing every frame.
    Running,
}

/// On/off controller for the per-frame background-effect draw.
///
/// At most one draw callback is ever pending. Pausing only clears a flag: the pending callback
/// sees it on its next invocation, performs no work, and does not reschedule.
#[derive(Debug)]
pub struct RenderGate {
    available: bool,
    active: bool,
    pending: Option<FrameHandle>,
    loops_started: u64,
    frames_drawn: u64,
}

impl RenderGate {
    pub(crate) fn new() -> Self {
        Self {
            available: true,
            active: false,
            pending: None,
            loops_started: 0,
            frames_drawn: 0,
        }
    }

    pub(crate) fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn state(&self) -> GateState {
        match (self.available, self.active) {
            (false, _) => GateState::Unavailable,
            (true, true) => GateState::Running,
            (true, false) => GateState::Idle,
        }
    }

    /// Handle of the in-flight draw callback, if any.
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Number of times a fresh draw loop was scheduled from idle.
    pub fn loops_started(&self) -> u64 {
        self.loops_started
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Start drawing. Returns `true` when a new draw callback was scheduled.
    ///
    /// When a callback is already in flight only the continue flag is raised, so the running or
    /// draining loop picks it up instead of a second loop being started.
    pub(crate) fn resume<T>(&mut self, clock: &mut EventLoop<T, FrameTask>) -> bool {
        if !self.available {
            return false;
        }
        self.active = true;
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(clock.request_frame(FrameTask::DrawEffect));
        self.loops_started += 1;
        tracing::debug!(loops = self.loops_started, "effect loop resumed");
        true
    }

    /// Stop drawing. Idempotent; legal before any resume.
    pub(crate) fn pause(&mut self) {
        if self.active {
            tracing::debug!("effect loop pausing");
        }
        self.active = false;
    }

    /// Draw callback body. Returns `true` when a frame was drawn.
    pub(crate) fn on_frame<T, P: Page>(
        &mut self,
        handle: FrameHandle,
        clock: &mut EventLoop<T, FrameTask>,
        page: &mut P,
    ) -> bool {
        if self.pending != Some(handle) {
            return false;
        }
        self.pending = None;
        if !self.active {
            return false;
        }
        page.draw_effect();
        self.frames_drawn += 1;
        self.pending = Some(clock.request_frame(FrameTask::DrawEffect));
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/gate.rs"]
mod tests;
