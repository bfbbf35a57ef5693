use std::collections::BTreeMap;

use crate::foundation::core::Millis;
use crate::foundation::error::{StageError, StageResult};

/// Identity of one pending animation-frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct FrameHandle(pub u64);

/// Next unit of work released by [`EventLoop::pop_due`].
#[derive(Debug)]
pub(crate) enum Due<T, F> {
    /// A timer reached its due time.
    Timer(T),
    /// A frame boundary was reached; callbacks run in request order.
    Frame(Vec<(FrameHandle, F)>),
}

/// Deterministic single-threaded scheduler for timers and animation frames.
///
/// Ordering rules:
/// - timers fire in due-time order, ties in scheduling order;
/// - a timer due at a frame boundary fires before that frame's callbacks;
/// - frame callbacks requested while a frame is being dispatched run on the next frame.
///
/// Time only moves forward, through [`EventLoop::pop_due`].
#[derive(Debug)]
pub(crate) struct EventLoop<T, F> {
    now: Millis,
    frame_interval_ms: u64,
    seq: u64,
    timers: BTreeMap<(Millis, u64), T>,
    next_handle: u64,
    frames: Vec<(FrameHandle, F)>,
    last_frame: Option<Millis>,
}

impl<T, F> EventLoop<T, F> {
    pub(crate) fn new(frame_interval_ms: u64) -> StageResult<Self> {
        if frame_interval_ms == 0 {
            return Err(StageError::validation("frame interval must be > 0 ms"));
        }
        Ok(Self {
            now: Millis::ZERO,
            frame_interval_ms,
            seq: 0,
            timers: BTreeMap::new(),
            next_handle: 0,
            frames: Vec::new(),
            last_frame: None,
        })
    }

    pub(crate) fn now(&self) -> Millis {
        self.now
    }

    /// Schedule `task` at an absolute time. Past times fire at the current time.
    pub(crate) fn schedule_at(&mut self, at: Millis, task: T) {
        let at = at.max(self.now);
        let seq = self.seq;
        self.seq = self.seq.wrapping_add(1);
        self.timers.insert((at, seq), task);
    }

    pub(crate) fn schedule_in(&mut self, delay_ms: u64, task: T) {
        self.schedule_at(self.now.after(delay_ms), task);
    }

    pub(crate) fn request_frame(&mut self, callback: F) -> FrameHandle {
        let handle = FrameHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.frames.push((handle, callback));
        handle
    }

    pub(crate) fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub(crate) fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    /// Earliest instant at which [`EventLoop::pop_due`] would release work.
    pub(crate) fn next_wakeup(&self) -> Option<Millis> {
        let timer = self.timers.keys().next().map(|(at, _)| *at);
        match (timer, self.next_frame_at()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn next_frame_at(&self) -> Option<Millis> {
        if self.frames.is_empty() {
            return None;
        }
        let interval = self.frame_interval_ms;
        let mut at = self.now.0.div_ceil(interval).saturating_mul(interval);
        if let Some(last) = self.last_frame
            && at <= last.0
        {
            at = last.0.saturating_add(interval);
        }
        Some(Millis(at))
    }

    /// Release the next unit of work due at or before `until`, moving the clock to its time.
    ///
    /// Returns `None` once nothing else is due; the clock then rests at `until`.
    pub(crate) fn pop_due(&mut self, until: Millis) -> Option<Due<T, F>> {
        let timer_at = self.timers.keys().next().map(|(at, _)| *at);
        let frame_at = self.next_frame_at();

        let take_timer = match (timer_at, frame_at) {
            (Some(t), Some(f)) => t <= f,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => {
                self.now = self.now.max(until);
                return None;
            }
        };

        if take_timer {
            let at = timer_at?;
            if at > until {
                self.now = self.now.max(until);
                return None;
            }
            let ((at, _), task) = self.timers.pop_first()?;
            self.now = at;
            Some(Due::Timer(task))
        } else {
            let at = frame_at?;
            if at > until {
                self.now = self.now.max(until);
                return None;
            }
            self.now = at;
            self.last_frame = Some(at);
            Some(Due::Frame(std::mem::take(&mut self.frames)))
        }
    }

    /// Release the earliest timer due at or before `until`, ignoring pending frames.
    pub(crate) fn pop_timer(&mut self, until: Millis) -> Option<T> {
        let (at, _) = *self.timers.keys().next()?;
        if at > until {
            return None;
        }
        let ((at, _), task) = self.timers.pop_first()?;
        self.now = self.now.max(at);
        Some(task)
    }

    /// Move the clock forward to `at` after the timers due by then were popped.
    pub(crate) fn rest_at(&mut self, at: Millis) {
        debug_assert!(self.timers.keys().next().is_none_or(|(t, _)| *t > at));
        self.now = self.now.max(at);
    }

    /// Release every pending frame callback at `at`, as a host-driven frame.
    ///
    /// Used when real animation frames pace the loop, so a long gap yields one frame instead of
    /// a catch-up burst. Nothing is released when a frame already ran at or after `at`, so
    /// duplicate host callbacks for one instant cannot run the same frame twice.
    pub(crate) fn take_frame(&mut self, at: Millis) -> Option<Vec<(FrameHandle, F)>> {
        if self.frames.is_empty() || self.last_frame.is_some_and(|last| at <= last) {
            return None;
        }
        self.now = self.now.max(at);
        self.last_frame = Some(self.now);
        Some(std::mem::take(&mut self.frames))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/event_loop.rs"]
mod tests;
