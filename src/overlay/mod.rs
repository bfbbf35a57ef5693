pub(crate) mod consent;
pub(crate) mod menu;
pub(crate) mod modal;
