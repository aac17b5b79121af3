//! Cursor state management
//!
//! The cursor carries everything DECSC saves: position, the rendition in
//! progress, character set designations, origin mode and autowrap. The
//! scrolling margins live next to it since every cursor motion is bounded
//! by them.

use serde::{Deserialize, Serialize};

use super::cell::Style;
use super::charset::CharsetState;

/// Cursor shape (DECSCUSR)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CursorShape {
    #[default]
    Block,
    Underline,
}

/// Cursor state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Row position (0-indexed)
    pub row: usize,
    /// Column position (0-indexed)
    pub col: usize,
    /// The last column was written; the next printable character wraps first
    pub pending_wrap: bool,
    /// Rendition applied to newly written characters
    pub style: Style,
    pub charsets: CharsetState,
    /// DECOM: addressing relative to the margins
    pub origin_mode: bool,
    /// DECAWM
    pub autowrap: bool,
    pub shape: CursorShape,
    pub blinking: bool,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            row: 0,
            col: 0,
            pending_wrap: false,
            style: Style::default(),
            charsets: CharsetState::default(),
            origin_mode: false,
            autowrap: true,
            shape: CursorShape::Block,
            blinking: false,
        }
    }
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset everything but the shape to power-on values
    pub fn reset(&mut self) {
        let (shape, blinking) = (self.shape, self.blinking);
        *self = Self {
            shape,
            blinking,
            ..Self::default()
        };
    }

    pub fn set_position(&mut self, row: usize, col: usize) {
        self.row = row;
        self.col = col;
        self.pending_wrap = false;
    }

    /// DECSCUSR: 0/1 blinking block, 2 steady block, 3 blinking underline,
    /// 4 steady underline
    pub fn set_style(&mut self, ps: u32) {
        let (shape, blinking) = match ps {
            0 | 1 => (CursorShape::Block, true),
            2 => (CursorShape::Block, false),
            3 => (CursorShape::Underline, true),
            4 => (CursorShape::Underline, false),
            _ => return,
        };
        self.shape = shape;
        self.blinking = blinking;
    }

    /// DECSCUSR parameter describing the current shape
    pub fn style_param(&self) -> u32 {
        match (self.shape, self.blinking) {
            (CursorShape::Block, true) => 1,
            (CursorShape::Block, false) => 2,
            (CursorShape::Underline, true) => 3,
            (CursorShape::Underline, false) => 4,
        }
    }
}

/// Scrolling margins, inclusive and 0-indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

impl Margins {
    /// Margins covering the whole screen
    pub fn full(width: usize, height: usize) -> Self {
        Self {
            top: 0,
            bottom: height.saturating_sub(1),
            left: 0,
            right: width.saturating_sub(1),
        }
    }

    pub fn contains_row(&self, row: usize) -> bool {
        row >= self.top && row <= self.bottom
    }

    pub fn contains_col(&self, col: usize) -> bool {
        col >= self.left && col <= self.right
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.contains_row(row) && self.contains_col(col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cell::Attrs;

    #[test]
    fn test_cursor_default() {
        let cursor = Cursor::new();
        assert_eq!((cursor.row, cursor.col), (0, 0));
        assert!(cursor.autowrap);
        assert!(!cursor.origin_mode);
        assert_eq!(cursor.charsets.gr, 2);
    }

    #[test]
    fn test_cursor_reset_keeps_shape() {
        let mut cursor = Cursor::new();
        cursor.set_style(4);
        cursor.set_position(5, 6);
        cursor.style.set(Attrs::BOLD);
        cursor.origin_mode = true;
        cursor.reset();
        assert_eq!((cursor.row, cursor.col), (0, 0));
        assert!(cursor.style.is_default());
        assert!(!cursor.origin_mode);
        assert_eq!(cursor.shape, CursorShape::Underline);
    }

    #[test]
    fn test_cursor_style_param() {
        let mut cursor = Cursor::new();
        for ps in 1..=4 {
            cursor.set_style(ps);
            assert_eq!(cursor.style_param(), ps);
        }
        cursor.set_style(9);
        assert_eq!(cursor.style_param(), 4);
    }

    #[test]
    fn test_margins() {
        let m = Margins::full(80, 24);
        assert_eq!((m.top, m.bottom, m.left, m.right), (0, 23, 0, 79));
        assert!(m.contains(23, 79));
        assert!(!m.contains_row(24));
    }
}
