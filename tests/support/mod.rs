#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use timed_dialog::{DialogTerminal, Key, KeyRead};

/// Terminal double that replays a fixed script of reads and records everything
/// the dialog writes. Running out of script is reported as a read error.
pub struct ScriptedTerminal {
    interactive: bool,
    columns: u16,
    script: VecDeque<KeyRead>,
    pub timeouts: Vec<Option<Duration>>,
    pub writes: Vec<String>,
}

impl ScriptedTerminal {
    pub fn new(script: impl IntoIterator<Item = KeyRead>) -> Self {
        Self {
            interactive: true,
            columns: 80,
            script: script.into_iter().collect(),
            timeouts: Vec::new(),
            writes: Vec::new(),
        }
    }

    pub fn non_interactive() -> Self {
        Self {
            interactive: false,
            ..Self::new([])
        }
    }

    pub fn with_columns(mut self, columns: u16) -> Self {
        self.columns = columns;
        self
    }

    pub fn reads(&self) -> usize {
        self.timeouts.len()
    }

    pub fn output(&self) -> String {
        self.writes.concat()
    }

    /// Net cursor row movement of everything written so far (positive is down).
    pub fn net_rows(&self) -> isize {
        row_delta(&self.output())
    }
}

impl DialogTerminal for ScriptedTerminal {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn read_key(&mut self, timeout: Option<Duration>) -> io::Result<KeyRead> {
        self.timeouts.push(timeout);
        self.script
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }

    fn write(&mut self, data: &str) {
        self.writes.push(data.to_string());
    }

    fn columns(&self) -> u16 {
        self.columns
    }
}

pub fn key(ch: char) -> KeyRead {
    KeyRead::Key(Key::Char(ch))
}

pub fn enter() -> KeyRead {
    KeyRead::Key(Key::Enter)
}

pub fn escape() -> KeyRead {
    KeyRead::Key(Key::Escape)
}

pub fn tick() -> KeyRead {
    KeyRead::TimedOut
}

/// Count line feeds as one row down and `ESC [ n A` as n rows up.
pub fn row_delta(output: &str) -> isize {
    let bytes = output.as_bytes();
    let mut delta = 0isize;
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == b'\n' {
            delta += 1;
            idx += 1;
            continue;
        }
        if bytes[idx] == 0x1b && bytes.get(idx + 1) == Some(&b'[') {
            let start = idx + 2;
            let mut end = start;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
            if bytes.get(end) == Some(&b'A') {
                let count: isize = output[start..end].parse().unwrap_or(1);
                delta -= count;
                idx = end + 1;
                continue;
            }
        }
        idx += 1;
    }
    delta
}

/// Status rows in the order they were drawn (text after the last clear on each frame).
pub fn status_rows(output: &str) -> Vec<String> {
    output
        .split("\x1b[?25l")
        .last()
        .unwrap_or("")
        .split("\x1b[K")
        .map(|row| {
            row.split(['\r', '\n'])
                .next()
                .unwrap_or("")
                .split("\x1b[")
                .next()
                .unwrap_or("")
                .to_string()
        })
        .filter(|row| row.starts_with("Continuing") || row.starts_with("Paused"))
        .collect()
}
