//! Mochi VT Emulation Engine
//!
//! The emulation core of a VT100/VT220/VT420/xterm compatible terminal,
//! with no window system or host process attached:
//!
//! - `core`: cells, lines, screen buffers, scrollback, selection, cursor and modes
//! - `parser`: the byte level control sequence state machine
//! - `input`: key, paste and mouse encoding toward the host
//! - `terminal`: the executor tying the above together
//! - `config`: engine preferences
//! - `headless`: a runner for tests and snapshots
//!
//! Bytes from the host go in through [`Terminal::process`]; replies come
//! back out of [`Terminal::take_output`].

pub mod config;
pub mod core;
pub mod headless;
pub mod input;
pub mod parser;
pub mod terminal;

pub use config::{Config, ConfigError};
pub use core::{Cell, Color, Cursor, Line, Point, ScreenBuffer, Snapshot, Style};
pub use input::{Key, KeypadKey, Modifiers};
pub use terminal::{Terminal, TerminalEvent};
