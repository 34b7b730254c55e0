//! Dialog orchestration.

pub mod dialog;
pub mod preset;

pub use dialog::{interpret_key, DialogState, KeyDecision, TimedDialog};
pub use preset::Preset;
