mod stage;

pub use stage::{Stage, StageReport};
