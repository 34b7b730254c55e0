//! Single-keystroke decoding.

use crate::core::choices::ReservedAction;

const ESC: char = '\x1b';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    /// Multi-byte escape sequence (arrow keys, function keys, alt-chords).
    Sequence(String),
}

impl Key {
    /// `p`, `P` or space.
    pub fn is_pause_toggle(&self) -> bool {
        matches!(self, Key::Char('p' | 'P' | ' '))
    }

    /// Reserved finalizing action bound to this key, if any. Pause keys are not
    /// included; they toggle state instead of finalizing.
    pub fn reserved_action(&self) -> Option<ReservedAction> {
        match self {
            Key::Enter => Some(ReservedAction::Enter),
            Key::Escape => Some(ReservedAction::Cancel),
            Key::Char('r' | 'R') => Some(ReservedAction::Redo),
            Key::Char('c' | 'C') => Some(ReservedAction::Cancel),
            Key::Char('q' | 'Q') => Some(ReservedAction::Quit),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Key::Char(ch) => Some(*ch),
            _ => None,
        }
    }
}

/// Whether `input` ends in the middle of an escape sequence and more bytes are
/// worth waiting for before decoding.
pub fn needs_more_input(input: &str) -> bool {
    let Some(start) = input.rfind(ESC) else {
        return false;
    };
    let tail = &input[start..];
    let mut chars = tail.chars().skip(1);
    match chars.next() {
        None => true,
        Some('[') => !chars.any(is_csi_final),
        Some('O') => chars.next().is_none(),
        Some(_) => false,
    }
}

/// Split a chunk of terminal input into keys.
///
/// A trailing lone ESC is reported as [`Key::Escape`]; callers that want to
/// disambiguate it from the start of a sequence wait on [`needs_more_input`] first.
pub fn split_keys(input: &str) -> Vec<Key> {
    let mut keys = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                keys.push(Key::Enter);
            }
            '\n' => keys.push(Key::Enter),
            ESC => {
                let Some(&next) = chars.peek() else {
                    keys.push(Key::Escape);
                    continue;
                };
                let mut sequence = String::from(ESC);
                sequence.push(next);
                chars.next();
                match next {
                    '[' => {
                        for part in chars.by_ref() {
                            sequence.push(part);
                            if is_csi_final(part) {
                                break;
                            }
                        }
                    }
                    'O' => {
                        if let Some(part) = chars.next() {
                            sequence.push(part);
                        }
                    }
                    _ => {}
                }
                keys.push(Key::Sequence(sequence));
            }
            other => keys.push(Key::Char(other)),
        }
    }

    keys
}

fn is_csi_final(ch: char) -> bool {
    ('\x40'..='\x7e').contains(&ch)
}
