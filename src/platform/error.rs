use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("standard input and output are not both attached to a terminal")]
    NotInteractive,

    #[error("failed to open controlling terminal {path}: {source}")]
    Open {
        path: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("failed to {operation} terminal attributes: {source}")]
    Termios {
        operation: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("terminal dialogs are only supported on Unix platforms")]
    Unsupported,
}

impl TerminalError {
    #[must_use]
    pub fn termios(operation: &'static str, source: io::Error) -> Self {
        Self::Termios { operation, source }
    }

    /// Whether this error only means "no terminal to talk to", as opposed to a
    /// terminal that exists but misbehaved.
    pub fn is_not_interactive(&self) -> bool {
        matches!(self, Self::NotInteractive | Self::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::TerminalError;

    #[test]
    fn messages_name_the_failing_operation() {
        let err = TerminalError::termios("read", io::Error::from_raw_os_error(libc::ENOTTY));
        assert!(err.to_string().starts_with("failed to read terminal attributes"));
    }

    #[test]
    fn not_interactive_classification() {
        assert!(TerminalError::NotInteractive.is_not_interactive());
        assert!(TerminalError::Unsupported.is_not_interactive());
        assert!(!TerminalError::termios("set", io::Error::other("x")).is_not_interactive());
    }
}
