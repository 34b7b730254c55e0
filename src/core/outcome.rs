//! Dialog outcome and its numeric code contract.

use std::fmt;

use crate::core::choices::{ChoiceSpec, CUSTOM_CODE_BASE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Enter, or any key when any-key is enabled. Also the non-interactive fallback.
    Continue,
    TimedOut,
    Cancel,
    Redo,
    Quit,
    /// Zero-based index into the decoded custom keys.
    Custom(usize),
}

impl Outcome {
    pub fn code(self) -> i32 {
        match self {
            Outcome::Continue => 0,
            Outcome::TimedOut => 1,
            Outcome::Cancel => 2,
            Outcome::Redo => 3,
            Outcome::Quit => 4,
            Outcome::Custom(index) => ChoiceSpec::custom_code(index),
        }
    }

    /// Inverse of [`Outcome::code`]. Codes 5..=9 and negatives are unassigned.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Outcome::Continue),
            1 => Some(Outcome::TimedOut),
            2 => Some(Outcome::Cancel),
            3 => Some(Outcome::Redo),
            4 => Some(Outcome::Quit),
            code if code >= CUSTOM_CODE_BASE => {
                usize::try_from(code - CUSTOM_CODE_BASE).ok().map(Outcome::Custom)
            }
            _ => None,
        }
    }

    /// Process exit status for this outcome. Codes above 255 saturate.
    pub fn exit_status(self) -> u8 {
        u8::try_from(self.code()).unwrap_or(u8::MAX)
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Continue => "continue",
            Outcome::TimedOut => "timeout",
            Outcome::Cancel => "cancel",
            Outcome::Redo => "redo",
            Outcome::Quit => "quit",
            Outcome::Custom(_) => "custom",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Custom(index) => write!(f, "custom({index}) = {}", self.code()),
            other => write!(f, "{} = {}", other.label(), other.code()),
        }
    }
}
