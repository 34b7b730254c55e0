//! Platform-specific terminal integrations.

pub mod error;
#[cfg(unix)]
mod restore;
pub mod tty_terminal;

pub use error::TerminalError;
pub use tty_terminal::TtyTerminal;
