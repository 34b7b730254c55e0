//! Core types: choice grammar, keys, outcomes and the terminal interface.

pub mod choices;
pub mod key;
pub mod outcome;
pub mod output;
pub mod terminal;
pub mod width;
