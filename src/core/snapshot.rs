//! Deterministic snapshot generation
//!
//! Snapshots capture the visible screen and the state that shapes it in a
//! serializable form for golden tests and the headless runner. The same
//! byte stream always produces the same snapshot.

use serde::{Deserialize, Serialize};

use super::buffer::ScreenBuffer;
use super::cell::{Attrs, Cell, Color};
use super::cursor::{Cursor, CursorShape, Margins};
use super::line::LineSize;
use super::modes::{Modes, MouseMode};

/// A complete snapshot of the terminal state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub cols: usize,
    pub rows: usize,
    /// Visible grid content (row-major)
    pub grid: Vec<LineSnapshot>,
    pub cursor: CursorSnapshot,
    pub margins: MarginsSnapshot,
    pub modes: ModesSnapshot,
    pub title: String,
    pub alternate_screen: bool,
    pub scrollback_lines: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSnapshot {
    pub cells: Vec<CellSnapshot>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub wrapped: bool,
    #[serde(default, skip_serializing_if = "is_single")]
    pub size: LineSize,
}

/// Snapshot of a single cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub ch: char,
    pub fg: ColorSnapshot,
    pub bg: ColorSnapshot,
    pub attrs: StyleSnapshot,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub link: u32,
}

/// Snapshot of a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ColorSnapshot {
    Default,
    Indexed { index: u8 },
    Rgb { r: u8, g: u8, b: u8 },
}

/// Snapshot of style attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StyleSnapshot {
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub blink: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub inverse: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub invisible: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub unerasable: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

fn is_single(size: &LineSize) -> bool {
    *size == LineSize::Single
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorSnapshot {
    pub col: usize,
    pub row: usize,
    pub visible: bool,
    pub shape: String,
    pub blinking: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MarginsSnapshot {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModesSnapshot {
    #[serde(default, skip_serializing_if = "is_false")]
    pub application_cursor: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub application_keypad: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub bracketed_paste: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub insert: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub linefeed_mode: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub reverse_video: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub origin: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub vt52: bool,
    pub autowrap: bool,
    pub mouse_tracking: String,
    pub conformance_level: u8,
}

impl From<&Color> for ColorSnapshot {
    fn from(color: &Color) -> Self {
        match color {
            Color::Default => ColorSnapshot::Default,
            Color::Indexed(i) => ColorSnapshot::Indexed { index: *i },
            Color::Rgb(r, g, b) => ColorSnapshot::Rgb { r: *r, g: *g, b: *b },
        }
    }
}

impl From<Attrs> for StyleSnapshot {
    fn from(attrs: Attrs) -> Self {
        StyleSnapshot {
            bold: attrs.contains(Attrs::BOLD),
            underline: attrs.contains(Attrs::UNDERLINE),
            blink: attrs.contains(Attrs::BLINK),
            inverse: attrs.contains(Attrs::INVERSE),
            invisible: attrs.contains(Attrs::INVISIBLE),
            unerasable: attrs.contains(Attrs::UNERASABLE),
        }
    }
}

impl From<&Cell> for CellSnapshot {
    fn from(cell: &Cell) -> Self {
        CellSnapshot {
            ch: cell.ch,
            fg: ColorSnapshot::from(&cell.style.fg),
            bg: ColorSnapshot::from(&cell.style.bg),
            attrs: StyleSnapshot::from(cell.style.attrs),
            link: cell.link,
        }
    }
}

fn mouse_name(mode: MouseMode) -> &'static str {
    match mode {
        MouseMode::None => "none",
        MouseMode::X10 => "x10",
        MouseMode::Normal => "normal",
        MouseMode::Highlight => "highlight",
        MouseMode::ButtonEvent => "button_event",
        MouseMode::AnyEvent => "any_event",
    }
}

/// Borrowed terminal state a snapshot is taken from
pub struct SnapshotSource<'a> {
    pub buffer: &'a ScreenBuffer,
    pub cursor: &'a Cursor,
    pub modes: &'a Modes,
    pub margins: &'a Margins,
    pub title: &'a str,
    pub alternate_screen: bool,
}

impl Snapshot {
    pub fn capture(source: SnapshotSource<'_>) -> Self {
        let buffer = source.buffer;
        let grid = buffer
            .lines()
            .iter()
            .map(|line| LineSnapshot {
                cells: line.cells().iter().map(CellSnapshot::from).collect(),
                wrapped: line.is_wrapped(),
                size: line.size(),
            })
            .collect();

        let cursor = source.cursor;
        let modes = source.modes;
        Snapshot {
            cols: buffer.width(),
            rows: buffer.height(),
            grid,
            cursor: CursorSnapshot {
                col: cursor.col.min(buffer.width() - 1),
                row: cursor.row,
                visible: modes.cursor_visible,
                shape: match cursor.shape {
                    CursorShape::Block => "block".to_string(),
                    CursorShape::Underline => "underline".to_string(),
                },
                blinking: cursor.blinking,
            },
            margins: MarginsSnapshot {
                top: source.margins.top,
                bottom: source.margins.bottom,
                left: source.margins.left,
                right: source.margins.right,
            },
            modes: ModesSnapshot {
                application_cursor: modes.cursor_keys_application,
                application_keypad: modes.keypad_application,
                bracketed_paste: modes.bracketed_paste,
                insert: modes.insert,
                linefeed_mode: modes.linefeed_newline,
                reverse_video: modes.reverse_screen,
                origin: cursor.origin_mode,
                vt52: !modes.ansi,
                autowrap: cursor.autowrap,
                mouse_tracking: mouse_name(modes.mouse).to_string(),
                conformance_level: modes.conformance_level,
            },
            title: source.title.to_string(),
            alternate_screen: source.alternate_screen,
            scrollback_lines: buffer.buffered(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Screen text, one line per row with trailing blanks and trailing
    /// empty rows removed
    pub fn to_text(&self) -> String {
        let mut result = String::new();
        for line in &self.grid {
            let row: String = line.cells.iter().map(|c| c.ch).collect();
            result.push_str(row.trim_end_matches(' '));
            result.push('\n');
        }
        while result.ends_with("\n\n") {
            result.pop();
        }
        result
    }

    /// Compare grid contents, ignoring cursor and mode state
    pub fn content_equals(&self, other: &Snapshot) -> bool {
        self.cols == other.cols && self.rows == other.rows && self.grid == other.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cell::Style;

    fn capture(buffer: &ScreenBuffer, cursor: &Cursor) -> Snapshot {
        let modes = Modes::default();
        let margins = Margins::full(buffer.width(), buffer.height());
        Snapshot::capture(SnapshotSource {
            buffer,
            cursor,
            modes: &modes,
            margins: &margins,
            title: "t",
            alternate_screen: false,
        })
    }

    #[test]
    fn test_snapshot_capture() {
        let mut buffer = ScreenBuffer::new(10, 3, 100);
        buffer.set_character(0, 0, 'H', Style::default(), 0);
        buffer.set_character(0, 1, 'i', Style::default(), 0);
        let mut cursor = Cursor::new();
        cursor.set_position(0, 2);

        let snapshot = capture(&buffer, &cursor);
        assert_eq!(snapshot.cols, 10);
        assert_eq!(snapshot.rows, 3);
        assert_eq!(snapshot.grid[0].cells[0].ch, 'H');
        assert_eq!(snapshot.cursor.col, 2);
        assert_eq!(snapshot.to_text(), "Hi\n");
    }

    #[test]
    fn test_snapshot_json_roundtrip() {
        let mut buffer = ScreenBuffer::new(5, 2, 0);
        let mut style = Style::with_colors(Color::RED, Color::Rgb(1, 2, 3));
        style.set(Attrs::BOLD);
        buffer.set_character(1, 4, 'Y', style, 0);

        let snapshot = capture(&buffer, &Cursor::new());
        let json = snapshot.to_json().unwrap();
        let restored = Snapshot::from_json(&json).unwrap();
        assert!(snapshot.content_equals(&restored));
        assert!(restored.grid[1].cells[4].attrs.bold);
    }

    #[test]
    fn test_color_snapshot() {
        assert_eq!(ColorSnapshot::from(&Color::Default), ColorSnapshot::Default);
        assert_eq!(ColorSnapshot::from(&Color::Indexed(5)), ColorSnapshot::Indexed { index: 5 });
        assert_eq!(ColorSnapshot::from(&Color::Rgb(255, 128, 0)), ColorSnapshot::Rgb { r: 255, g: 128, b: 0 });
    }
}
