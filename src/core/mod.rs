//! Terminal Core Module
//!
//! Platform-independent terminal state. This module contains:
//! - Cell and style representation
//! - Lines, screen buffers and scrollback
//! - Selection and search
//! - Cursor, margins, character sets and mode flags
//! - Deterministic snapshot generation
//!
//! Nothing here parses bytes; the terminal drives these types.

mod buffer;
mod cell;
mod charset;
mod cursor;
mod line;
mod modes;
mod scrollback;
mod selection;
mod snapshot;

pub use buffer::{EraseMode, ScreenBuffer};
pub use cell::{Attrs, Cell, Color, Style};
pub use charset::{Charset, CharsetState};
pub use cursor::{Cursor, CursorShape, Margins};
pub use line::{Line, LineSize};
pub use modes::{Encoding, Modes, MouseMode};
pub use scrollback::Scrollback;
pub use selection::{Point, Selection};
pub use snapshot::{CellSnapshot, ColorSnapshot, LineSnapshot, Snapshot, SnapshotSource, StyleSnapshot};
