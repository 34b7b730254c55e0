//! In-place redraw of the dialog block.
//!
//! The block is 1–3 rows: optional message, optional keymap legend, then the
//! status row. The cursor rests at the end of the status row between frames;
//! `rewind` returns it to the first row so the next frame overwrites the same
//! rows instead of scrolling.

use crate::core::choices::KeymapEntry;
use crate::core::output::TerminalCmd;
use crate::core::width::{to_single_row, truncate_to_width};
use crate::render::theme::DialogTheme;

const ELLIPSIS: &str = "…";

/// One frame of block content, already styled.
#[derive(Debug, Clone, Copy)]
pub struct Block<'a> {
    pub message: &'a str,
    pub keymap: &'a str,
    pub status: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRenderer {
    show_message: bool,
    show_keymap: bool,
}

impl BlockRenderer {
    pub fn new(show_message: bool, show_keymap: bool) -> Self {
        Self {
            show_message,
            show_keymap,
        }
    }

    /// Rows the block occupies; fixed for the renderer's lifetime.
    pub fn line_count(&self) -> usize {
        1 + usize::from(self.show_message) + usize::from(self.show_keymap)
    }

    /// Each row is flattened to a single terminal row before clipping, so the
    /// block height never depends on its content.
    pub fn render(&self, block: &Block<'_>, columns: usize) -> Vec<TerminalCmd> {
        // Leave the last column free so a full row never enters pending-wrap.
        let max_width = columns.saturating_sub(1).max(1);
        let mut rows: Vec<&str> = Vec::with_capacity(3);
        if self.show_message {
            rows.push(block.message);
        }
        if self.show_keymap {
            rows.push(block.keymap);
        }
        rows.push(block.status);

        let mut cmds = Vec::with_capacity(rows.len() * 4);
        for (idx, row) in rows.iter().enumerate() {
            if idx > 0 {
                cmds.push(TerminalCmd::LineBreak);
            }
            cmds.push(TerminalCmd::CarriageReturn);
            cmds.push(TerminalCmd::ClearLine);
            let row = to_single_row(row);
            cmds.push(TerminalCmd::bytes(truncate_to_width(&row, max_width, ELLIPSIS)));
        }
        cmds
    }

    /// Move from the end of the status row back to the start of the first row.
    pub fn rewind(&self) -> Vec<TerminalCmd> {
        vec![
            TerminalCmd::MoveUp(self.line_count() - 1),
            TerminalCmd::CarriageReturn,
        ]
    }

    /// Leave the block. With `stay_on_status` the cursor returns to the start of
    /// the status row; otherwise it moves to a fresh row below the block.
    pub fn finish(&self, stay_on_status: bool) -> Vec<TerminalCmd> {
        if stay_on_status {
            vec![TerminalCmd::CarriageReturn]
        } else {
            vec![TerminalCmd::LineBreak]
        }
    }
}

/// Styled legend, e.g. `[q] quit  [x] option 10`.
pub fn format_keymap(entries: &[KeymapEntry], theme: &DialogTheme) -> String {
    entries
        .iter()
        .map(|entry| {
            format!(
                "[{}] {}",
                (theme.key)(&entry.keys),
                (theme.key_label)(&entry.label)
            )
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Styled status row: the countdown while running, a resume hint while paused.
pub fn format_status(label: &str, remaining: u64, paused: bool, theme: &DialogTheme) -> String {
    if paused {
        (theme.paused)("Paused. Press p or Space to resume")
    } else {
        (theme.countdown)(&format!("{label} {remaining}s"))
    }
}
