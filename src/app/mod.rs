//! Binary-side application wiring: configuration merge, terminal and progress UI.

pub(crate) mod config_runtime;
pub(crate) mod progress_manager;
pub(crate) mod terminal;
