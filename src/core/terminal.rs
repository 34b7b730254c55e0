//! Terminal interface the dialog drives.

use std::time::Duration;

use crate::core::key::Key;

/// Read timeout while the countdown is running.
pub const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyRead {
    Key(Key),
    TimedOut,
}

/// Minimal terminal interface for the dialog.
pub trait DialogTerminal {
    /// Whether both standard input and standard output are attached to a terminal.
    /// The dialog never reads or renders when this is false.
    fn is_interactive(&self) -> bool;

    /// Read exactly one key. `None` blocks until a key arrives; `Some` gives up
    /// after the timeout and returns [`KeyRead::TimedOut`].
    fn read_key(&mut self, timeout: Option<Duration>) -> std::io::Result<KeyRead>;

    /// Write control sequences and text to the terminal. Best effort.
    fn write(&mut self, data: &str);

    /// Terminal width in columns.
    fn columns(&self) -> u16;
}

/// Paused reads block indefinitely; running reads wait at most one [`TICK`].
pub fn read_decision_key<T: DialogTerminal + ?Sized>(
    term: &mut T,
    paused: bool,
) -> std::io::Result<KeyRead> {
    let timeout = if paused { None } else { Some(TICK) };
    term.read_key(timeout)
}
