mod sequencer;

pub use sequencer::{BootAction, BootPhase, BootPlan, BootStep, BootTimings, TimerSequencer};
