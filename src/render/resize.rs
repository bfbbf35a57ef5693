/// Trailing-edge debounce for window resizes.
///
/// Every resize bumps a generation; only the settle timer carrying the latest generation acts,
/// so earlier timers expire harmlessly instead of being cancelled.
#[derive(Debug)]
pub(crate) struct ResizeDebounce {
    quiet_ms: u64,
    generation: u64,
}

impl ResizeDebounce {
    pub(crate) fn new(quiet_ms: u64) -> Self {
        Self {
            quiet_ms,
            generation: 0,
        }
    }

    /// Register a resize; returns the generation and delay for its settle timer.
    pub(crate) fn on_resize(&mut self) -> (u64, u64) {
        self.generation = self.generation.wrapping_add(1);
        (self.generation, self.quiet_ms)
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }
}
