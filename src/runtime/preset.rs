//! Named configurations of the dialog engine.

use crate::runtime::dialog::TimedDialog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// General dialog: every reserved action, five seconds.
    #[default]
    Dialog,
    /// Countdown helper: Enter continues, cancel and pause available.
    Autocontinue,
    /// Timed ok/redo/quit confirmation.
    Confirm,
}

impl Preset {
    pub fn choices(self) -> &'static str {
        match self {
            Preset::Dialog => "AERCPQ",
            Preset::Autocontinue => "ECP",
            Preset::Confirm => "ERQ",
        }
    }

    pub fn seconds(self) -> u64 {
        match self {
            Preset::Dialog | Preset::Autocontinue => 5,
            Preset::Confirm => 10,
        }
    }

    pub fn countdown_label(self) -> &'static str {
        match self {
            Preset::Dialog => "Continuing in",
            Preset::Autocontinue => "Auto-continue in",
            Preset::Confirm => "Accepting in",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::Dialog => "dialog",
            Preset::Autocontinue => "autocontinue",
            Preset::Confirm => "confirm",
        }
    }

    /// Dialog configured from this preset. `choices` and `seconds` override the
    /// preset's own values when given.
    pub fn dialog(self, choices: Option<&str>, seconds: Option<u64>) -> TimedDialog {
        TimedDialog::new(choices.unwrap_or(self.choices()))
            .with_seconds(seconds.unwrap_or(self.seconds()))
            .with_countdown_label(self.countdown_label())
    }
}
