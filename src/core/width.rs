//! Visible width and truncation for styled single-line text.
//!
//! ANSI control sequences occupy no columns. Truncation happens on grapheme
//! boundaries so a line never wraps, which would break in-place redraws.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ANSI_RESET: &str = "\x1b[0m";
const TAB_STOP: usize = 8;

/// Byte length of the ANSI sequence starting at `pos`, if any. Handles CSI
/// (`ESC [ .. final`) and OSC (`ESC ] .. BEL` or `ESC ] .. ESC \`).
pub fn ansi_len_at(input: &str, pos: usize) -> Option<usize> {
    let bytes = input.as_bytes();
    if bytes.get(pos) != Some(&0x1b) {
        return None;
    }
    match bytes.get(pos + 1)? {
        b'[' => bytes[pos + 2..]
            .iter()
            .position(|b| (0x40..=0x7e).contains(b))
            .map(|offset| offset + 3),
        b']' => {
            let body = &bytes[pos + 2..];
            for (idx, b) in body.iter().enumerate() {
                if *b == 0x07 {
                    return Some(idx + 3);
                }
                if *b == 0x1b && body.get(idx + 1) == Some(&b'\\') {
                    return Some(idx + 4);
                }
            }
            None
        }
        _ => None,
    }
}

enum Segment<'a> {
    Ansi(&'a str),
    Text(&'a str),
}

fn segments(input: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut idx = 0;
    let mut text_start = 0;
    while idx < input.len() {
        if let Some(len) = ansi_len_at(input, idx) {
            if text_start < idx {
                out.push(Segment::Text(&input[text_start..idx]));
            }
            out.push(Segment::Ansi(&input[idx..idx + len]));
            idx += len;
            text_start = idx;
            continue;
        }
        idx += input[idx..].chars().next().map_or(1, char::len_utf8);
    }
    if text_start < input.len() {
        out.push(Segment::Text(&input[text_start..]));
    }
    out
}

fn grapheme_width(grapheme: &str) -> usize {
    UnicodeWidthStr::width(grapheme)
}

/// SGR (`ESC [ .. m`) and OSC sequences only restyle or annotate text; every
/// other escape can move the cursor.
fn is_inert_escape(code: &str) -> bool {
    code.starts_with("\x1b]") || (code.starts_with("\x1b[") && code.ends_with('m'))
}

/// Flatten `input` into text that occupies exactly one terminal row.
///
/// Line breaks become single spaces, tabs expand to the next 8-column stop,
/// cursor-moving escapes and other control characters are dropped. SGR and
/// OSC sequences are kept.
pub fn to_single_row(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut column = 0;
    for segment in segments(input) {
        let text = match segment {
            Segment::Ansi(code) => {
                if is_inert_escape(code) {
                    out.push_str(code);
                }
                continue;
            }
            Segment::Text(text) => text,
        };
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '\t' => {
                    let pad = TAB_STOP - column % TAB_STOP;
                    out.push_str(&" ".repeat(pad));
                    column += pad;
                }
                '\r' | '\n' => {
                    if ch == '\r' && chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    out.push(' ');
                    column += 1;
                }
                ch if ch.is_control() => {}
                ch => {
                    out.push(ch);
                    column += UnicodeWidthChar::width(ch).unwrap_or(0);
                }
            }
        }
    }
    out
}

pub fn visible_width(input: &str) -> usize {
    segments(input)
        .into_iter()
        .map(|segment| match segment {
            Segment::Ansi(_) => 0,
            Segment::Text(text) => text.graphemes(true).map(grapheme_width).sum(),
        })
        .sum()
}

/// Truncate `text` to at most `max_width` columns, appending `ellipsis` when
/// anything was cut. Styling is reset before the ellipsis.
pub fn truncate_to_width(text: &str, max_width: usize, ellipsis: &str) -> String {
    if max_width == 0 {
        return String::new();
    }
    if visible_width(text) <= max_width {
        return text.to_string();
    }

    let target = max_width.saturating_sub(visible_width(ellipsis));
    if target == 0 {
        return ellipsis.chars().take(max_width).collect();
    }

    let mut out = String::with_capacity(text.len());
    let mut used = 0;
    'outer: for segment in segments(text) {
        match segment {
            Segment::Ansi(code) => out.push_str(code),
            Segment::Text(chunk) => {
                for grapheme in chunk.graphemes(true) {
                    let width = grapheme_width(grapheme);
                    if used + width > target {
                        break 'outer;
                    }
                    out.push_str(grapheme);
                    used += width;
                }
            }
        }
    }
    out.push_str(ANSI_RESET);
    out.push_str(ellipsis);
    out
}
