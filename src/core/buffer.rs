//! Screen buffer
//!
//! A grid of lines of one fixed width plus the scrollback history fed by
//! forward scrolls. Rows are addressed with a signed index: `0..height` are
//! on screen and negative indices reach into history (`-1` is the most
//! recently evicted row).
//!
//! Primitives never fail. Row and column arguments come from cursor state
//! that the terminal keeps in range; violations are `debug_assert!`ed and
//! clamped in release builds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::cell::{Cell, Color, Style};
use super::line::{Line, LineSize};
use super::scrollback::Scrollback;
use super::selection::Selection;

/// Which part of a line or display an erase targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseMode {
    /// From the cursor to the end (inclusive)
    ToEnd,
    /// From the start to the cursor (inclusive)
    ToStart,
    /// The whole line or display
    All,
}

impl EraseMode {
    /// Map an ED/EL parameter; unknown values are rejected
    pub fn from_param(param: u32) -> Option<Self> {
        match param {
            0 => Some(EraseMode::ToEnd),
            1 => Some(EraseMode::ToStart),
            2 => Some(EraseMode::All),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Hyperlink {
    uri: String,
    id: String,
}

/// Registrations between hyperlink garbage collections
const LINK_GC_INTERVAL: usize = 64;

/// One screen of lines plus its scrollback
#[derive(Debug, Clone)]
pub struct ScreenBuffer {
    width: usize,
    height: usize,
    lines: Vec<Line>,
    history: Scrollback,
    /// Colors used for erase fills
    erase_fg: Color,
    erase_bg: Color,
    pub(crate) selection: Selection,
    pub(crate) word_chars: Vec<char>,
    links: BTreeMap<u32, Hyperlink>,
    next_link: u32,
    links_since_gc: usize,
    dirty: bool,
}

impl ScreenBuffer {
    /// Create a blank buffer; `scrollback` 0 disables history
    pub fn new(width: usize, height: usize, scrollback: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            lines: (0..height).map(|_| Line::new(width)).collect(),
            history: Scrollback::new(scrollback),
            erase_fg: Color::Default,
            erase_bg: Color::Default,
            selection: Selection::default(),
            word_chars: vec!['-', '.', '/'],
            links: BTreeMap::new(),
            next_link: 1,
            links_since_gc: 0,
            dirty: true,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of rows held in history
    pub fn buffered(&self) -> usize {
        self.history.len()
    }

    pub fn has_scrollback(&self) -> bool {
        self.history.capacity() > 0
    }

    pub fn scrollback(&self) -> &Scrollback {
        &self.history
    }

    pub fn set_scrollback_capacity(&mut self, capacity: usize) {
        self.history.set_capacity(capacity);
    }

    pub fn clear_scrollback(&mut self) {
        self.history.clear();
        self.selection.clear();
        self.dirty = true;
    }

    /// Get a row by signed index; negative indices address history
    pub fn get_line(&self, index: isize) -> Option<&Line> {
        if index >= 0 {
            self.lines.get(index as usize)
        } else {
            self.history.get_from_end(index.unsigned_abs() - 1)
        }
    }

    /// Mutable access to an on-screen row
    pub fn line_mut(&mut self, row: usize) -> Option<&mut Line> {
        self.dirty = true;
        self.lines.get_mut(row)
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.lines.get(row).and_then(|line| line.cell(col))
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn erase_colors(&self) -> (Color, Color) {
        (self.erase_fg, self.erase_bg)
    }

    pub fn set_erase_colors(&mut self, fg: Color, bg: Color) {
        self.erase_fg = fg;
        self.erase_bg = bg;
    }

    /// A blank cell in the current erase colors
    pub fn blank(&self) -> Cell {
        Cell::erased(self.erase_fg, self.erase_bg)
    }

    fn blank_line(&self) -> Line {
        Line::blank(self.width, self.erase_fg, self.erase_bg)
    }

    fn clamp_row(&self, row: usize) -> usize {
        debug_assert!(row < self.height, "row {row} out of range");
        row.min(self.height - 1)
    }

    fn clamp_col(&self, col: usize) -> usize {
        debug_assert!(col < self.width, "column {col} out of range");
        col.min(self.width - 1)
    }

    /// Overwrite one cell
    pub fn set_character(&mut self, row: usize, col: usize, ch: char, style: Style, link: u32) {
        let (row, col) = (self.clamp_row(row), self.clamp_col(col));
        if let Some(cell) = self.lines[row].cell_mut(col) {
            *cell = Cell::with_link(ch, style, link);
        }
        self.dirty = true;
    }

    /// Mark a row as continuing onto the next one
    pub fn wrap_line(&mut self, row: usize) {
        let row = self.clamp_row(row);
        self.lines[row].set_wrapped(true);
    }

    pub fn set_line_size(&mut self, row: usize, size: LineSize) {
        let row = self.clamp_row(row);
        self.lines[row].set_size(size);
        self.dirty = true;
    }

    /// Shift `[col, right_margin]` right by one, blanking `col`
    pub fn insert_character(&mut self, row: usize, col: usize, right_margin: usize) {
        let (row, col) = (self.clamp_row(row), self.clamp_col(col));
        let fill = self.blank();
        self.lines[row].insert_cell(col, right_margin + 1, fill);
        self.dirty = true;
    }

    /// Shift `[col + 1, right_margin]` left by one, blanking the margin cell
    pub fn delete_character(&mut self, row: usize, col: usize, right_margin: usize) {
        let (row, col) = (self.clamp_row(row), self.clamp_col(col));
        let fill = self.blank();
        self.lines[row].delete_cell(col, right_margin + 1, fill);
        self.dirty = true;
    }

    /// ECH: blank `count` cells from `col`, leaving protected cells alone
    pub fn erase_character(&mut self, row: usize, col: usize, count: usize) {
        let (row, col) = (self.clamp_row(row), self.clamp_col(col));
        let fill = self.blank();
        let end = col.saturating_add(count).min(self.width);
        self.lines[row].erase(col, end, fill, false);
        self.dirty = true;
    }

    pub fn erase_line(&mut self, row: usize, col: usize, mode: EraseMode, selective: bool) {
        let (row, col) = (self.clamp_row(row), self.clamp_col(col));
        let fill = self.blank();
        let width = self.width;
        let line = &mut self.lines[row];
        match mode {
            EraseMode::ToEnd => line.erase(col, width, fill, selective),
            EraseMode::ToStart => line.erase(0, col + 1, fill, selective),
            EraseMode::All => line.erase(0, width, fill, selective),
        }
        line.set_wrapped(false);
        self.dirty = true;
    }

    pub fn erase_display(&mut self, row: usize, col: usize, mode: EraseMode, selective: bool) {
        let (row, col) = (self.clamp_row(row), self.clamp_col(col));
        let fill = self.blank();
        let width = self.width;
        for (y, line) in self.lines.iter_mut().enumerate() {
            line.set_wrapped(false);
            line.set_size(LineSize::Single);
            match mode {
                EraseMode::ToEnd if y == row => line.erase(col, width, fill, selective),
                EraseMode::ToEnd if y > row => line.erase(0, width, fill, selective),
                EraseMode::ToStart if y == row => line.erase(0, col + 1, fill, selective),
                EraseMode::ToStart if y < row => line.erase(0, width, fill, selective),
                EraseMode::All => line.erase(0, width, fill, selective),
                _ => {},
            }
        }
        self.dirty = true;
    }

    /// Reset every row to blank, ignoring protection
    pub fn clear(&mut self) {
        let fill = self.blank();
        for line in &mut self.lines {
            line.reset(fill);
        }
        self.selection.clear();
        self.dirty = true;
    }

    /// DECALN: fill the screen with 'E' in the erase colors
    pub fn fill_with_e(&mut self) {
        let fill = Cell::new('E', Style::with_colors(self.erase_fg, self.erase_bg));
        for line in &mut self.lines {
            line.reset(fill);
        }
        self.dirty = true;
    }

    fn full_width(&self, left: usize, right: usize) -> bool {
        left == 0 && right + 1 >= self.width
    }

    /// Move rows `top + 1..=bottom` up by one inside columns `left..=right`,
    /// blanking the bottom row of the rectangle
    pub fn scroll_forward(&mut self, top: usize, bottom: usize, left: usize, right: usize) {
        if top >= bottom || bottom >= self.height {
            return;
        }
        self.selection.clear();
        self.dirty = true;

        if self.full_width(left, right) {
            let fill = self.blank_line();
            let evicted = std::mem::replace(&mut self.lines[top], fill);
            if top == 0 && self.has_scrollback() {
                self.history.push(evicted);
            }
            self.lines[top..=bottom].rotate_left(1);
            return;
        }

        let right = right.min(self.width - 1);
        let fill = self.blank();
        for y in top..bottom {
            let (upper, lower) = self.lines.split_at_mut(y + 1);
            upper[y].cells_mut()[left..=right].copy_from_slice(&lower[0].cells()[left..=right]);
        }
        let last = &mut self.lines[bottom];
        last.cells_mut()[left..=right].fill(fill);
        last.set_wrapped(false);
    }

    /// Move rows `top..bottom` down by one inside columns `left..=right`.
    /// A full-screen scroll pulls the newest history row back in.
    pub fn scroll_backward(&mut self, top: usize, bottom: usize, left: usize, right: usize) {
        if top >= bottom || bottom >= self.height {
            return;
        }
        self.selection.clear();
        self.dirty = true;

        if self.full_width(left, right) {
            let restored = if top == 0 && bottom == self.height - 1 {
                self.history.pop_newest()
            } else {
                None
            };
            let mut incoming = restored.unwrap_or_else(|| self.blank_line());
            incoming.resize(self.width, self.blank());
            self.lines[bottom] = incoming;
            self.lines[top..=bottom].rotate_right(1);
            return;
        }

        let right = right.min(self.width - 1);
        let fill = self.blank();
        for y in (top + 1..=bottom).rev() {
            let (upper, lower) = self.lines.split_at_mut(y);
            lower[0].cells_mut()[left..=right].copy_from_slice(&upper[y - 1].cells()[left..=right]);
        }
        let first = &mut self.lines[top];
        first.cells_mut()[left..=right].fill(fill);
        first.set_wrapped(false);
    }

    /// Visit every cell of the inclusive rectangle, clipped to the grid
    pub fn for_each_in_rectangle<F>(&mut self, top: usize, left: usize, bottom: usize, right: usize, mut visit: F)
    where
        F: FnMut(usize, usize, &mut Cell),
    {
        let bottom = bottom.min(self.height - 1);
        let right = right.min(self.width - 1);
        if top > bottom || left > right {
            return;
        }
        for y in top..=bottom {
            for x in left..=right {
                if let Some(cell) = self.lines[y].cell_mut(x) {
                    visit(y, x, cell);
                }
            }
        }
        self.dirty = true;
    }

    /// Reallocate the grid without reflow. Rows are added or removed at
    /// the bottom and `anchor` moves by the row delta, clamped to history.
    pub fn resize(&mut self, width: usize, height: usize, anchor: &mut isize) {
        let width = width.max(1);
        let height = height.max(1);
        if width == self.width && height == self.height {
            return;
        }
        let fill = self.blank();
        if width != self.width {
            for line in &mut self.lines {
                line.resize(width, fill);
            }
            self.history.resize_lines(width, fill);
            self.width = width;
        }
        let delta = height as isize - self.height as isize;
        if height < self.height {
            self.lines.truncate(height);
        } else {
            let blank = self.blank_line();
            self.lines.resize(height, blank);
        }
        self.height = height;
        *anchor = (*anchor + delta).clamp(-(self.buffered() as isize), 0);
        self.selection.clear();
        self.dirty = true;
    }

    /// Register a hyperlink, reusing an existing entry with the same
    /// non-empty id and uri
    pub fn add_hyperlink(&mut self, uri: &str, id: &str) -> u32 {
        if !id.is_empty() {
            if let Some((&link, _)) = self.links.iter().find(|(_, l)| l.id == id && l.uri == uri) {
                return link;
            }
        }
        self.links_since_gc += 1;
        if self.links_since_gc >= LINK_GC_INTERVAL {
            self.collect_hyperlinks();
        }
        let link = self.next_link;
        self.next_link = self.next_link.wrapping_add(1).max(1);
        self.links.insert(link, Hyperlink {
            uri: uri.to_string(),
            id: id.to_string(),
        });
        link
    }

    pub fn hyperlink(&self, link: u32) -> Option<&str> {
        self.links.get(&link).map(|l| l.uri.as_str())
    }

    pub fn hyperlink_count(&self) -> usize {
        self.links.len()
    }

    /// Drop registry entries no on-screen or history cell refers to
    pub fn collect_hyperlinks(&mut self) {
        self.links_since_gc = 0;
        if self.links.is_empty() {
            return;
        }
        let mut live = std::collections::BTreeSet::new();
        for line in self.lines.iter().chain(self.history.iter()) {
            live.extend(line.cells().iter().filter(|c| c.link != 0).map(|c| c.link));
        }
        self.links.retain(|link, _| live.contains(link));
    }

    /// Plain text of an on-screen or history row
    pub fn line_text(&self, index: isize) -> String {
        self.get_line(index).map(Line::text).unwrap_or_default()
    }
}
