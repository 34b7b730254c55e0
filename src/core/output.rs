//! Typed terminal output commands and a single output gate.
//!
//! Invariant: all dialog writes flow through `OutputGate::flush(..)`.

use crate::core::terminal::DialogTerminal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCmd {
    /// Text (possibly styled) to be written at the cursor.
    Bytes(String),
    /// Return to column 0 of the current row.
    CarriageReturn,
    /// Erase from the cursor to the end of the row.
    ClearLine,
    /// Carriage return plus line feed; moves one row down.
    LineBreak,
    /// Move the cursor up `n` rows. Zero is a no-op.
    MoveUp(usize),
    HideCursor,
    ShowCursor,
}

impl TerminalCmd {
    pub fn bytes(data: impl Into<String>) -> Self {
        Self::Bytes(data.into())
    }

    /// Append the control sequence for this command to `out`.
    pub fn encode(&self, out: &mut String) {
        match self {
            TerminalCmd::Bytes(data) => out.push_str(data),
            TerminalCmd::CarriageReturn => out.push('\r'),
            TerminalCmd::ClearLine => out.push_str("\x1b[K"),
            TerminalCmd::LineBreak => out.push_str("\r\n"),
            TerminalCmd::MoveUp(0) => {}
            TerminalCmd::MoveUp(n) => out.push_str(&format!("\x1b[{n}A")),
            TerminalCmd::HideCursor => out.push_str("\x1b[?25l"),
            TerminalCmd::ShowCursor => out.push_str("\x1b[?25h"),
        }
    }

    /// Net vertical cursor movement in rows (positive is down).
    pub fn row_delta(&self) -> isize {
        match self {
            TerminalCmd::LineBreak => 1,
            TerminalCmd::MoveUp(n) => -(*n as isize),
            _ => 0,
        }
    }
}

#[derive(Debug, Default)]
pub struct OutputGate {
    cmds: Vec<TerminalCmd>,
}

impl OutputGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: TerminalCmd) {
        self.cmds.push(cmd);
    }

    pub fn extend<I>(&mut self, cmds: I)
    where
        I: IntoIterator<Item = TerminalCmd>,
    {
        self.cmds.extend(cmds);
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Flush buffered commands to the terminal as a single write.
    pub fn flush<T: DialogTerminal + ?Sized>(&mut self, term: &mut T) {
        if self.cmds.is_empty() {
            return;
        }
        let mut out = String::new();
        for cmd in self.cmds.drain(..) {
            cmd.encode(&mut out);
        }
        term.write(&out);
    }
}

/// Encode a batch of commands without a terminal.
pub fn encode_all(cmds: &[TerminalCmd]) -> String {
    let mut out = String::new();
    for cmd in cmds {
        cmd.encode(&mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{encode_all, OutputGate, TerminalCmd};
    use crate::core::key::Key;
    use crate::core::terminal::{DialogTerminal, KeyRead};

    #[derive(Default)]
    struct CaptureTerminal {
        writes: Vec<String>,
    }

    impl DialogTerminal for CaptureTerminal {
        fn is_interactive(&self) -> bool {
            true
        }

        fn read_key(
            &mut self,
            _timeout: Option<std::time::Duration>,
        ) -> std::io::Result<KeyRead> {
            Ok(KeyRead::Key(Key::Enter))
        }

        fn write(&mut self, data: &str) {
            self.writes.push(data.to_string());
        }

        fn columns(&self) -> u16 {
            80
        }
    }

    #[test]
    fn encodes_control_sequences() {
        let out = encode_all(&[
            TerminalCmd::CarriageReturn,
            TerminalCmd::ClearLine,
            TerminalCmd::bytes("hi"),
            TerminalCmd::LineBreak,
            TerminalCmd::MoveUp(2),
            TerminalCmd::MoveUp(0),
            TerminalCmd::HideCursor,
            TerminalCmd::ShowCursor,
        ]);
        assert_eq!(out, "\r\x1b[Khi\r\n\x1b[2A\x1b[?25l\x1b[?25h");
    }

    #[test]
    fn flush_batches_into_one_write() {
        let mut gate = OutputGate::new();
        gate.push(TerminalCmd::bytes("a"));
        gate.extend([TerminalCmd::LineBreak, TerminalCmd::bytes("b")]);
        let mut term = CaptureTerminal::default();
        gate.flush(&mut term);
        assert!(gate.is_empty());
        assert_eq!(term.writes, vec!["a\r\nb".to_string()]);

        gate.flush(&mut term);
        assert_eq!(term.writes.len(), 1, "empty flush must not write");
    }

    #[test]
    fn row_delta_tracks_vertical_moves() {
        assert_eq!(TerminalCmd::LineBreak.row_delta(), 1);
        assert_eq!(TerminalCmd::MoveUp(3).row_delta(), -3);
        assert_eq!(TerminalCmd::ClearLine.row_delta(), 0);
    }
}
