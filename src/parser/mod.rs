//! Terminal escape sequence parser
//!
//! A stateful parser that converts bytes into terminal actions, plus the
//! CSI dispatch tables the terminal resolves control sequences with.
//! Based on the DEC parser model from <https://vt100.net/emu/dec_ansi_parser>

mod actions;
mod csi;
mod state;

pub use actions::{Action, CsiSequence, CsiTag, DcsCommand};
pub use csi::{CommandTable, CsiCommand};
pub use state::{Parser, ParserMode};
