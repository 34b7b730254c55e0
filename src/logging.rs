//! Tracing setup.
//!
//! Logs never go to stdout or stderr: the dialog shares the terminal with the
//! calling script, so events are written as JSON lines to a file instead.

use std::env;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::time::UtcTime;

use crate::config::EnvConfig;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Trace file: the configured path, or a file in the temp directory.
pub fn trace_log_path(config: &EnvConfig) -> PathBuf {
    config
        .trace_log
        .clone()
        .unwrap_or_else(|| env::temp_dir().join("timed_dialog_trace.jsonl"))
}

fn max_level(config: &EnvConfig) -> LevelFilter {
    if config.debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    }
}

/// Install the global JSON subscriber once. A no-op when tracing is disabled or
/// the log file cannot be opened.
pub fn init_tracing(config: &EnvConfig) {
    if !config.tracing_enabled() {
        return;
    }

    let _ = TRACING_INIT.get_or_init(|| {
        let path = trace_log_path(config);
        let file = match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => file,
            Err(_) => return,
        };
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_timer(UtcTime::rfc_3339())
            .with_max_level(max_level(config))
            .with_writer(Mutex::new(file))
            .with_current_span(false)
            .with_span_list(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
