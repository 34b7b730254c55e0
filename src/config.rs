//! Environment configuration.

use std::env;
use std::path::PathBuf;

pub const WRITE_LOG_VAR: &str = "TIMED_DIALOG_WRITE_LOG";
pub const TRACE_LOG_VAR: &str = "TIMED_DIALOG_TRACE_LOG";
pub const DEBUG_VAR: &str = "TIMED_DIALOG_DEBUG";
pub const NO_COLOR_VAR: &str = "NO_COLOR";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// Mirror of every byte written to the terminal.
    pub write_log: Option<PathBuf>,
    /// JSON tracing sink. Setting it enables tracing.
    pub trace_log: Option<PathBuf>,
    pub debug: bool,
    pub no_color: bool,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            write_log: env_path_opt(WRITE_LOG_VAR),
            trace_log: env_path_opt(TRACE_LOG_VAR),
            debug: env_flag(DEBUG_VAR),
            no_color: env_string_opt(NO_COLOR_VAR).is_some(),
        }
    }

    pub fn tracing_enabled(&self) -> bool {
        self.debug || self.trace_log.is_some()
    }

    pub fn color_enabled(&self) -> bool {
        !self.no_color
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_path_opt(key: &str) -> Option<PathBuf> {
    env_string_opt(key).map(PathBuf::from)
}
