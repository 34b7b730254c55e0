//! Block rendering and styling.

pub mod block;
pub mod theme;

pub use block::{Block, BlockRenderer};
pub use theme::DialogTheme;
