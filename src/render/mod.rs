pub(crate) mod gate;
pub(crate) mod grid;
pub(crate) mod resize;
