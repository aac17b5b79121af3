//! Scrollback buffer implementation
//!
//! Stores lines that have scrolled off the top of the visible screen, oldest
//! first, up to a fixed capacity. Once full, the oldest line is evicted.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::cell::Cell;
use super::line::Line;

/// FIFO of lines that scrolled off the top of the screen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scrollback {
    lines: VecDeque<Line>,
    capacity: usize,
}

impl Scrollback {
    /// Create a new scrollback buffer with the given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append the newest line, returning the evicted oldest line if the
    /// buffer was full
    pub fn push(&mut self, line: Line) -> Option<Line> {
        if self.capacity == 0 {
            return Some(line);
        }
        let evicted = if self.lines.len() >= self.capacity {
            self.lines.pop_front()
        } else {
            None
        };
        self.lines.push_back(line);
        evicted
    }

    /// Remove and return the most recently pushed line
    pub fn pop_newest(&mut self) -> Option<Line> {
        self.lines.pop_back()
    }

    /// Get a line by index (0 = oldest line in scrollback)
    pub fn get(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    /// Get a line by index from the end (0 = most recent line)
    pub fn get_from_end(&self, index: usize) -> Option<&Line> {
        let len = self.lines.len();
        if index >= len {
            return None;
        }
        self.lines.get(len - 1 - index)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Iterate over all lines from oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Line> + ExactSizeIterator {
        self.lines.iter()
    }

    /// Truncate or pad every stored line to a new width
    pub fn resize_lines(&mut self, cols: usize, fill: Cell) {
        for line in &mut self.lines {
            line.resize(cols, fill);
        }
    }

    /// Set a new capacity, dropping the oldest lines when shrinking
    pub fn set_capacity(&mut self, capacity: usize) {
        while self.lines.len() > capacity {
            self.lines.pop_front();
        }
        self.capacity = capacity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cell::Style;

    fn numbered(i: u32) -> Line {
        let mut line = Line::new(10);
        if let Some(cell) = line.cell_mut(0) {
            *cell = Cell::new(char::from_digit(i, 10).unwrap_or('?'), Style::default());
        }
        line
    }

    fn first_char(line: Option<&Line>) -> char {
        line.unwrap().cell(0).unwrap().ch
    }

    #[test]
    fn test_scrollback_push_and_get() {
        let mut sb = Scrollback::new(5);
        assert!(sb.is_empty());
        for i in 0..3 {
            assert!(sb.push(numbered(i)).is_none());
        }
        assert_eq!(sb.len(), 3);
        assert_eq!(first_char(sb.get(0)), '0');
        assert_eq!(first_char(sb.get(2)), '2');
        assert_eq!(first_char(sb.get_from_end(0)), '2');
        assert!(sb.get_from_end(3).is_none());
    }

    #[test]
    fn test_scrollback_evicts_oldest() {
        let mut sb = Scrollback::new(3);
        let mut evicted = Vec::new();
        for i in 0..5 {
            if let Some(line) = sb.push(numbered(i)) {
                evicted.push(line.cell(0).unwrap().ch);
            }
        }
        assert_eq!(evicted, vec!['0', '1']);
        let chars: Vec<char> = sb.iter().map(|l| l.cell(0).unwrap().ch).collect();
        assert_eq!(chars, vec!['2', '3', '4']);
    }

    #[test]
    fn test_scrollback_zero_capacity() {
        let mut sb = Scrollback::new(0);
        assert!(sb.push(Line::new(10)).is_some());
        assert!(sb.is_empty());
    }

    #[test]
    fn test_scrollback_pop_newest() {
        let mut sb = Scrollback::new(4);
        sb.push(numbered(1));
        sb.push(numbered(2));
        assert_eq!(sb.pop_newest().unwrap().cell(0).unwrap().ch, '2');
        assert_eq!(sb.len(), 1);
    }

    #[test]
    fn test_scrollback_set_capacity() {
        let mut sb = Scrollback::new(10);
        for i in 0..5 {
            sb.push(numbered(i));
        }
        sb.set_capacity(3);
        assert_eq!(sb.len(), 3);
        assert_eq!(first_char(sb.get(0)), '2');
    }
}
