//! Timed single-keystroke decision dialog for shell scripts.
//!
//! A dialog draws a 1–3 row block on the controlling terminal (optional message,
//! keymap legend, countdown), redraws it in place once per second, and returns
//! exactly one [`Outcome`] whose numeric code is the contract with the caller:
//!
//! | outcome | code |
//! |---|---|
//! | continue | 0 |
//! | timed out | 1 |
//! | cancel | 2 |
//! | redo | 3 |
//! | quit | 4 |
//! | custom key *n* | 10 + n |
//!
//! Invariant: the dialog never writes to the process's stdout or stderr; all
//! output goes to `/dev/tty` through `core::output::OutputGate::flush(..)`.
//! Without an interactive terminal the dialog returns [`Outcome::Continue`]
//! immediately and draws nothing.

pub mod config;
pub mod logging;

pub mod core;
pub mod platform;
pub mod render;
pub mod runtime;

use tracing::{debug, warn};

/// Choice grammar decoding.
pub use crate::core::choices::{
    keys_match, ChoiceSpec, KeymapEntry, ReservedAction, ReservedSet, CUSTOM_CODE_BASE,
    DEFAULT_CHOICES,
};
/// Keys and the terminal interface.
pub use crate::core::key::Key;
pub use crate::core::outcome::Outcome;
pub use crate::core::terminal::{DialogTerminal, KeyRead, TICK};

pub use crate::config::EnvConfig;
pub use crate::platform::{TerminalError, TtyTerminal};
pub use crate::render::DialogTheme;
pub use crate::runtime::{Preset, TimedDialog};

/// Run `dialog` on the controlling terminal. Falls back to
/// [`Outcome::Continue`] when no interactive terminal can be opened.
pub fn run_on_tty(dialog: &TimedDialog, config: &EnvConfig) -> Outcome {
    logging::init_tracing(config);
    match TtyTerminal::open(config) {
        Ok(mut terminal) => dialog.run(&mut terminal),
        Err(err) if err.is_not_interactive() => {
            debug!(error = %err, "no interactive terminal; continuing");
            Outcome::Continue
        }
        Err(err) => {
            warn!(error = %err, "terminal unusable; continuing");
            Outcome::Continue
        }
    }
}

/// Show a dialog with the given countdown, message and choices on the
/// controlling terminal, configured from the environment.
pub fn run_timed_dialog(seconds: u64, message: &str, choices: &str) -> Outcome {
    let config = EnvConfig::from_env();
    let dialog = TimedDialog::new(choices)
        .with_seconds(seconds)
        .with_message(message)
        .with_theme(DialogTheme::for_color(config.color_enabled()));
    run_on_tty(&dialog, &config)
}
