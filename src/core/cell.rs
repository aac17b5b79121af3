//! Terminal Cell
//!
//! Represents a single cell in the terminal grid: one character plus the
//! style it was written with and an optional hyperlink reference.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Packed rendition bits of a [`Style`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Attrs: u16 {
        const BOLD = 1 << 0;
        const UNDERLINE = 1 << 1;
        const BLINK = 1 << 2;
        const INVERSE = 1 << 3;
        const INVISIBLE = 1 << 4;
        /// DECSCA: survives selective erase (DECSED, DECSEL, DECSERA)
        const UNERASABLE = 1 << 5;
        /// SPA/EPA (ESC V / ESC W): survives every erase
        const PROTECTED = 1 << 6;
    }
}

/// Color representation for terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Color {
    /// Default foreground or background color
    #[default]
    Default,
    /// Indexed color (0-15 base ANSI, 16-255 extended palette)
    Indexed(u8),
    /// True color RGB
    Rgb(u8, u8, u8),
}

impl Color {
    // Standard ANSI colors (0-7)
    pub const BLACK: Color = Color::Indexed(0);
    pub const RED: Color = Color::Indexed(1);
    pub const GREEN: Color = Color::Indexed(2);
    pub const YELLOW: Color = Color::Indexed(3);
    pub const BLUE: Color = Color::Indexed(4);
    pub const MAGENTA: Color = Color::Indexed(5);
    pub const CYAN: Color = Color::Indexed(6);
    pub const WHITE: Color = Color::Indexed(7);

    // Bright ANSI colors (8-15)
    pub const BRIGHT_BLACK: Color = Color::Indexed(8);
    pub const BRIGHT_RED: Color = Color::Indexed(9);
    pub const BRIGHT_GREEN: Color = Color::Indexed(10);
    pub const BRIGHT_YELLOW: Color = Color::Indexed(11);
    pub const BRIGHT_BLUE: Color = Color::Indexed(12);
    pub const BRIGHT_MAGENTA: Color = Color::Indexed(13);
    pub const BRIGHT_CYAN: Color = Color::Indexed(14);
    pub const BRIGHT_WHITE: Color = Color::Indexed(15);

    /// Convert an indexed color to RGB using the standard xterm palette
    pub fn indexed_to_rgb(index: u8) -> (u8, u8, u8) {
        match index {
            0 => (0, 0, 0),
            1 => (205, 0, 0),
            2 => (0, 205, 0),
            3 => (205, 205, 0),
            4 => (0, 0, 238),
            5 => (205, 0, 205),
            6 => (0, 205, 205),
            7 => (229, 229, 229),
            8 => (127, 127, 127),
            9 => (255, 0, 0),
            10 => (0, 255, 0),
            11 => (255, 255, 0),
            12 => (92, 92, 255),
            13 => (255, 0, 255),
            14 => (0, 255, 255),
            15 => (255, 255, 255),
            // 6x6x6 color cube
            16..=231 => {
                let n = index - 16;
                let level = |c: u8| if c == 0 { 0 } else { 55 + c * 40 };
                (level(n / 36), level((n / 6) % 6), level(n % 6))
            },
            // Grayscale ramp
            232..=255 => {
                let gray = 8 + (index - 232) * 10;
                (gray, gray, gray)
            },
        }
    }
}

/// Rendition applied to written cells: colors plus attribute bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub attrs: Attrs,
}

impl Style {
    /// A style with the given colors and no attributes
    pub fn with_colors(fg: Color, bg: Color) -> Self {
        Self {
            fg,
            bg,
            attrs: Attrs::empty(),
        }
    }

    pub fn set(&mut self, attrs: Attrs) {
        self.attrs.insert(attrs);
    }

    pub fn clear(&mut self, attrs: Attrs) {
        self.attrs.remove(attrs);
    }

    pub fn toggle(&mut self, attrs: Attrs) {
        self.attrs.toggle(attrs);
    }

    pub fn contains(&self, attrs: Attrs) -> bool {
        self.attrs.contains(attrs)
    }

    pub fn set_fg(&mut self, color: Color) {
        self.fg = color;
    }

    pub fn set_bg(&mut self, color: Color) {
        self.bg = color;
    }

    /// Reset to default colors and no attributes (SGR 0)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// A single cell in the terminal grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// The character in this cell (space when blank)
    pub ch: char,
    /// Rendition the character was written with
    pub style: Style,
    /// Hyperlink ID (0 = no hyperlink)
    pub link: u32,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: Style::default(),
            link: 0,
        }
    }
}

impl Cell {
    /// Create a new cell with a character and style
    pub fn new(ch: char, style: Style) -> Self {
        Self { ch, style, link: 0 }
    }

    /// Create a cell carrying a hyperlink reference
    pub fn with_link(ch: char, style: Style, link: u32) -> Self {
        Self { ch, style, link }
    }

    /// A blank cell painted with the given erase colors
    pub fn erased(fg: Color, bg: Color) -> Self {
        Self::new(' ', Style::with_colors(fg, bg))
    }

    /// Check if this cell shows nothing but a space
    pub fn is_blank(&self) -> bool {
        self.ch == ' '
    }

    /// Whether a plain (non-selective) erase may clear this cell
    pub fn is_erasable(&self, selective: bool) -> bool {
        if self.style.contains(Attrs::PROTECTED) {
            return false;
        }
        !(selective && self.style.contains(Attrs::UNERASABLE))
    }

    /// Get the display width of this cell's character
    pub fn width(&self) -> usize {
        use unicode_width::UnicodeWidthChar;
        self.ch.width().unwrap_or(0)
    }
}
