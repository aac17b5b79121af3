//! Selection and search over a screen buffer
//!
//! The selection is a pair of endpoints in buffer coordinates (negative rows
//! reach into scrollback) plus a block flag. Endpoints are stored as given
//! and normalized whenever they are read.

use serde::{Deserialize, Serialize};

use super::buffer::ScreenBuffer;

/// A position in buffer coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    /// Row index (negative for scrollback)
    pub line: isize,
    /// Column index
    pub col: usize,
}

impl Point {
    pub fn new(line: isize, col: usize) -> Self {
        Self { line, col }
    }
}

/// A text selection, possibly empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    begin: Point,
    end: Point,
    block: bool,
}

impl Selection {
    pub fn new(begin: Point, end: Point, block: bool) -> Self {
        Self { begin, end, block }
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    pub fn is_block(&self) -> bool {
        self.block
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Normalized endpoints. In block mode rows and columns are ordered
    /// independently; in stream mode the endpoints are ordered as points.
    pub fn range(&self) -> (Point, Point) {
        if self.block {
            (
                Point::new(self.begin.line.min(self.end.line), self.begin.col.min(self.end.col)),
                Point::new(self.begin.line.max(self.end.line), self.begin.col.max(self.end.col)),
            )
        } else if self.end < self.begin {
            (self.end, self.begin)
        } else {
            (self.begin, self.end)
        }
    }

    /// Whether a cell lies inside the selection (end column exclusive)
    pub fn contains(&self, line: isize, col: usize) -> bool {
        if self.is_empty() {
            return false;
        }
        let (begin, end) = self.range();
        if line < begin.line || line > end.line {
            return false;
        }
        if self.block {
            return col >= begin.col && col < end.col;
        }
        (line > begin.line || col >= begin.col) && (line < end.line || col < end.col)
    }
}

/// Word-break classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Sep,
    Let,
    Com,
    Hira,
    Kata,
    Han,
    Other,
}

impl CharClass {
    fn index(self) -> usize {
        self as usize
    }
}

// Rows are states, columns are classes; -1 stops the scan.
const NEXT_STATE: [[i8; 7]; 5] = [
    [0, 1, 1, 2, 3, 4, 0],
    [-1, 1, 1, -1, -1, -1, -1],
    [-1, -1, 2, 2, -1, -1, -1],
    [-1, -1, 3, 2, 3, -1, -1],
    [-1, -1, 4, 2, -1, 4, -1],
];

const PREV_STATE: [[i8; 7]; 6] = [
    [0, 1, 2, 3, 4, 5, 0],
    [-1, 2, 1, 3, 4, 5, -1],
    [-1, 2, 2, -1, -1, -1, -1],
    [-1, -1, 3, 3, 4, 5, -1],
    [-1, -1, 4, -1, 4, -1, -1],
    [-1, -1, 5, -1, -1, 5, -1],
];

impl ScreenBuffer {
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn set_selection(&mut self, begin: Point, end: Point, block: bool) {
        self.selection = Selection::new(begin, end, block);
        self.mark_dirty();
    }

    /// Select every row of history and screen
    pub fn select_all(&mut self) {
        let begin = Point::new(-(self.buffered() as isize), 0);
        let end = Point::new(self.height() as isize - 1, self.width());
        self.set_selection(begin, end, false);
    }

    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.mark_dirty();
        }
    }

    /// Extra characters treated as word connectors by `find_word`
    pub fn set_word_characters(&mut self, chars: &str) {
        self.word_chars = chars.chars().collect();
    }

    /// Text of the current selection. Stream selections drop the line
    /// break after soft-wrapped rows; block selections end every row with
    /// one.
    pub fn get_selected_text(&self) -> String {
        let mut text = String::new();
        if self.selection.is_empty() {
            return text;
        }
        let block = self.selection.is_block();
        let (begin, end) = self.selection.range();
        let width = self.width();

        for index in begin.line..=end.line {
            let Some(line) = self.get_line(index) else {
                continue;
            };
            let (c1, c2) = if block {
                (begin.col, end.col)
            } else {
                let c1 = if index == begin.line { begin.col } else { 0 };
                let c2 = if index == end.line { end.col } else { width };
                (c1, c2)
            };
            let (c1, c2) = (c1.min(width), c2.min(width));

            let mut row: String = line.cells()[c1..c2.max(c1)]
                .iter()
                .filter(|cell| cell.width() > 0)
                .map(|cell| cell.ch)
                .collect();
            if !block && (index == end.line || !line.is_wrapped()) {
                row.truncate(row.trim_end_matches(' ').len());
            }
            text.push_str(&row);
            if block || (index != end.line && !line.is_wrapped()) {
                text.push('\n');
            }
        }
        text
    }

    fn char_class(&self, ch: char) -> CharClass {
        let code = ch as u32;
        if ch == ' ' || ch == '\t' || ch == '\u{3000}' {
            CharClass::Sep
        } else if self.word_chars.contains(&ch) || (code >= 0x300 && unicode_width::UnicodeWidthChar::width(ch) == Some(0)) {
            CharClass::Com
        } else if (0x3040..=0x309F).contains(&code) {
            CharClass::Hira
        } else if (0x30A0..=0x30FF).contains(&code) || (0xFF66..=0xFF9F).contains(&code) {
            CharClass::Kata
        } else if (0x4E00..=0x9FFF).contains(&code) || (0x3400..=0x4DBF).contains(&code) {
            CharClass::Han
        } else if ch.is_alphanumeric() {
            CharClass::Let
        } else {
            CharClass::Other
        }
    }

    /// Word boundaries around a position, following soft wraps across rows.
    /// Returns the begin point and the exclusive end point.
    pub fn find_word(&self, line: isize, col: usize) -> Option<(Point, Point)> {
        let width = self.width();
        let mut start = line;
        let mut offset = col.min(width);
        while self.get_line(start - 1).is_some_and(|l| l.is_wrapped()) {
            start -= 1;
            offset += width;
        }

        let mut chars = Vec::new();
        let mut index = start;
        while let Some(row) = self.get_line(index) {
            chars.extend(row.cells().iter().map(|c| c.ch));
            if !row.is_wrapped() {
                break;
            }
            index += 1;
        }
        while chars.last() == Some(&' ') {
            chars.pop();
        }
        if offset >= chars.len() {
            return None;
        }

        let classes: Vec<CharClass> = chars.iter().map(|&c| self.char_class(c)).collect();

        let mut last = offset;
        let mut state = 0usize;
        while last < classes.len() {
            let next = NEXT_STATE[state][classes[last].index()];
            if next < 0 {
                break;
            }
            state = next as usize;
            last += 1;
        }

        let mut first = last;
        state = 0;
        while first > 0 {
            let next = PREV_STATE[state][classes[first - 1].index()];
            if next < 0 {
                break;
            }
            state = next as usize;
            first -= 1;
        }
        if first > offset || last <= offset {
            return None;
        }

        let to_point = |off: usize, exclusive: bool| {
            if exclusive && off > 0 && off % width == 0 {
                Point::new(start + (off / width) as isize - 1, width)
            } else {
                Point::new(start + (off / width) as isize, off % width)
            }
        };
        Some((to_point(first, false), to_point(last, true)))
    }

    /// History and screen as one character run, oldest history row first
    fn flatten(&self) -> Vec<char> {
        let mut chars = Vec::with_capacity((self.buffered() + self.height()) * self.width());
        for line in self.scrollback().iter().chain(self.lines().iter()) {
            chars.extend(line.cells().iter().map(|c| c.ch));
        }
        chars
    }

    fn offset_of(&self, line: isize, col: usize) -> usize {
        let row = (line + self.buffered() as isize).max(0) as usize;
        row * self.width() + col.min(self.width())
    }

    fn point_at(&self, offset: usize) -> Point {
        let width = self.width();
        Point::new((offset / width) as isize - self.buffered() as isize, offset % width)
    }

    /// First match starting at or after the position. With `wrap`, the scan
    /// continues once from the top up to the starting position.
    pub fn find_next(&self, line: isize, col: usize, needle: &str, ignore_case: bool, wrap: bool) -> Option<Point> {
        let pattern = fold(needle.chars(), ignore_case);
        if pattern.is_empty() {
            return None;
        }
        let hay = fold(self.flatten().into_iter(), ignore_case);
        let origin = self.offset_of(line, col);
        let last_start = hay.len().checked_sub(pattern.len())?;

        let matches = |at: usize| hay[at..at + pattern.len()] == pattern[..];
        (origin..=last_start)
            .find(|&at| matches(at))
            .or_else(|| wrap.then(|| (0..origin.min(last_start + 1)).find(|&at| matches(at))).flatten())
            .map(|at| self.point_at(at))
    }

    /// Last match ending at or before the position. With `wrap`, the scan
    /// continues once from the bottom back down to the starting position.
    pub fn find_previous(&self, line: isize, col: usize, needle: &str, ignore_case: bool, wrap: bool) -> Option<Point> {
        let pattern = fold(needle.chars(), ignore_case);
        if pattern.is_empty() {
            return None;
        }
        let hay = fold(self.flatten().into_iter(), ignore_case);
        let origin = self.offset_of(line, col);
        let last_start = hay.len().checked_sub(pattern.len())?;

        let matches = |at: usize| hay[at..at + pattern.len()] == pattern[..];
        let before = origin.checked_sub(pattern.len()).map(|limit| limit.min(last_start));
        before
            .and_then(|limit| (0..=limit).rev().find(|&at| matches(at)))
            .or_else(|| wrap.then(|| (origin..=last_start).rev().find(|&at| matches(at))).flatten())
            .map(|at| self.point_at(at))
    }
}

fn fold(chars: impl Iterator<Item = char>, ignore_case: bool) -> Vec<char> {
    if ignore_case {
        chars.map(|c| c.to_lowercase().next().unwrap_or(c)).collect()
    } else {
        chars.collect()
    }
}
