//! Writing characters and moving the cursor
//!
//! Every motion is bounded by the margins while the cursor is inside them
//! and by the screen edges otherwise. Moving past the bottom or top margin
//! scrolls the region instead.

use std::time::Instant;

use super::{PendingScroll, Terminal, SMOOTH_SCROLL_DELAY};
use crate::core::{Margins, Style};

impl Terminal {
    /// Print one translated character at the cursor
    pub(super) fn write_char(&mut self, ch: char) {
        let region = self.region();
        let width = self.width();
        let inside = region.contains_col(self.cursor.col);
        let right = if inside { region.right } else { width - 1 };
        let left = if inside { region.left } else { 0 };

        if self.cursor.pending_wrap {
            self.cursor.pending_wrap = false;
            if self.cursor.autowrap {
                let row = self.cursor.row;
                self.screen_mut().wrap_line(row);
                self.index();
                self.cursor.col = left;
                // The wrapped character belongs on the new row
                if let Some(pending) = self.smooth_scroll.take() {
                    self.perform_scroll(pending.forward, pending.region);
                }
            }
        }

        let (row, col) = (self.cursor.row, self.cursor.col.min(width - 1));
        if self.modes.insert {
            self.screen_mut().insert_character(row, col, right);
        }
        let (style, link) = (self.cursor.style, self.link);
        self.screen_mut().set_character(row, col, ch, style, link);
        self.last_char = Some(ch);

        if col >= right {
            self.cursor.pending_wrap = true;
        } else {
            self.cursor.col = col + 1;
        }
    }

    // ---- Vertical motion ----

    pub(super) fn cursor_up(&mut self, n: usize) {
        let region = self.region();
        let top = if self.cursor.row >= region.top { region.top } else { 0 };
        let row = self.cursor.row.saturating_sub(n).max(top);
        self.cursor.set_position(row, self.cursor.col);
    }

    pub(super) fn cursor_down(&mut self, n: usize) {
        let region = self.region();
        let bottom = if self.cursor.row <= region.bottom {
            region.bottom
        } else {
            self.height() - 1
        };
        let row = self.cursor.row.saturating_add(n).min(bottom);
        self.cursor.set_position(row, self.cursor.col);
    }

    /// IND: down one row, scrolling at the bottom margin
    pub(super) fn index(&mut self) {
        let region = self.region();
        if self.cursor.row == region.bottom {
            self.scroll(true);
        } else if self.cursor.row + 1 < self.height() {
            self.cursor.row += 1;
        }
        self.cursor.pending_wrap = false;
    }

    /// RI: up one row, scrolling at the top margin
    pub(super) fn reverse_index(&mut self) {
        let region = self.region();
        if self.cursor.row == region.top {
            self.scroll(false);
        } else if self.cursor.row > 0 {
            self.cursor.row -= 1;
        }
        self.cursor.pending_wrap = false;
    }

    /// LF, honouring LNM
    pub(super) fn linefeed(&mut self) {
        if self.modes.linefeed_newline {
            self.carriage_return();
        }
        self.index();
    }

    /// NEL and CRLF
    pub(super) fn newline(&mut self) {
        self.carriage_return();
        self.index();
    }

    // ---- Horizontal motion ----

    pub(super) fn carriage_return(&mut self) {
        let region = self.region();
        let col = if self.cursor.col >= region.left { region.left } else { 0 };
        self.cursor.set_position(self.cursor.row, col);
    }

    pub(super) fn cursor_left(&mut self, n: usize) {
        let region = self.region();
        let left = if self.cursor.col >= region.left { region.left } else { 0 };
        let col = self.cursor.col.min(self.width() - 1).saturating_sub(n).max(left);
        self.cursor.set_position(self.cursor.row, col);
    }

    pub(super) fn cursor_right(&mut self, n: usize) {
        let region = self.region();
        let right = if self.cursor.col <= region.right {
            region.right
        } else {
            self.width() - 1
        };
        let col = self.cursor.col.saturating_add(n).min(right);
        self.cursor.set_position(self.cursor.row, col);
    }

    /// HT: advance to the next tab stop, stopping at the right margin
    pub(super) fn tab(&mut self, n: usize) {
        let region = self.region();
        let right = if self.cursor.col <= region.right {
            region.right
        } else {
            self.width() - 1
        };
        let mut col = self.cursor.col;
        for _ in 0..n {
            while col < right {
                col += 1;
                if self.tab_stops.get(col).copied().unwrap_or(false) {
                    break;
                }
            }
        }
        self.cursor.set_position(self.cursor.row, col);
    }

    /// CBT: back to the previous tab stop, stopping at the left margin
    pub(super) fn back_tab(&mut self, n: usize) {
        let region = self.region();
        let left = if self.cursor.col >= region.left { region.left } else { 0 };
        let mut col = self.cursor.col.min(self.width() - 1);
        for _ in 0..n {
            while col > left {
                col -= 1;
                if self.tab_stops.get(col).copied().unwrap_or(false) {
                    break;
                }
            }
        }
        self.cursor.set_position(self.cursor.row, col);
    }

    pub(super) fn set_tab_stop(&mut self) {
        let col = self.cursor.col;
        if let Some(stop) = self.tab_stops.get_mut(col) {
            *stop = true;
        }
    }

    /// DECBI: left one column, or shift the region right at the left margin
    pub(super) fn back_index(&mut self) {
        let region = self.region();
        if self.cursor.col == region.left {
            if region.contains_row(self.cursor.row) {
                for row in region.top..=region.bottom {
                    self.screen_mut().insert_character(row, region.left, region.right);
                }
            }
        } else {
            self.cursor_left(1);
        }
    }

    /// DECFI: right one column, or shift the region left at the right margin
    pub(super) fn forward_index(&mut self) {
        let region = self.region();
        if self.cursor.col == region.right {
            if region.contains_row(self.cursor.row) {
                for row in region.top..=region.bottom {
                    self.screen_mut().delete_character(row, region.left, region.right);
                }
            }
        } else {
            self.cursor_right(1);
        }
    }

    /// SL / SR: shift every row of the region by `n` columns
    pub(super) fn shift_columns(&mut self, n: usize, left: bool) {
        let region = self.region();
        for _ in 0..n.min(region.right - region.left + 1) {
            for row in region.top..=region.bottom {
                if left {
                    self.screen_mut().delete_character(row, region.left, region.right);
                } else {
                    self.screen_mut().insert_character(row, region.left, region.right);
                }
            }
        }
    }

    // ---- Absolute motion ----

    /// Move to a 0-based position, relative to the margins in origin mode
    pub(super) fn move_to(&mut self, row: usize, col: usize) {
        let region = self.region();
        let (mut row, mut col) = (row, col);
        if self.cursor.origin_mode {
            row = row.saturating_add(region.top).min(region.bottom);
            col = col.saturating_add(region.left).min(region.right);
        }
        let row = row.min(self.height() - 1);
        let col = col.min(self.width() - 1);
        self.cursor.set_position(row, col);
    }

    /// Move to a 0-based column, keeping the row
    pub(super) fn move_to_column(&mut self, col: usize) {
        let row = self.cursor.row;
        let row = if self.cursor.origin_mode {
            row.saturating_sub(self.region().top)
        } else {
            row
        };
        self.move_to(row, col);
    }

    /// Move to a 0-based row, keeping the column
    pub(super) fn move_to_row(&mut self, row: usize) {
        let col = self.cursor.col;
        let col = if self.cursor.origin_mode {
            col.saturating_sub(self.region().left)
        } else {
            col
        };
        self.move_to(row, col);
    }

    // ---- Scrolling ----

    /// Scroll the region one line, deferring the step when DECSCLM is set
    pub(super) fn scroll(&mut self, forward: bool) {
        let region = self.region();
        if !self.modes.smooth_scroll || self.status_active {
            self.perform_scroll(forward, region);
            return;
        }
        if let Some(pending) = self.smooth_scroll.take() {
            self.perform_scroll(pending.forward, pending.region);
        }
        self.smooth_scroll = Some(PendingScroll {
            forward,
            region,
            deadline: Instant::now() + SMOOTH_SCROLL_DELAY,
        });
    }

    pub(super) fn perform_scroll(&mut self, forward: bool, region: Margins) {
        let buffer = self.screen_mut();
        if forward {
            buffer.scroll_forward(region.top, region.bottom, region.left, region.right);
        } else {
            buffer.scroll_backward(region.top, region.bottom, region.left, region.right);
        }
    }

    // ---- Save and restore ----

    fn saved_slot(&self) -> usize {
        usize::from(self.alternate_active)
    }

    /// DECSC
    pub(super) fn save_cursor(&mut self) {
        let slot = self.saved_slot();
        self.saved_cursor[slot] = Some(self.cursor.clone());
    }

    /// DECRC. Without a saved cursor the cursor homes and the rendition,
    /// character sets and origin mode return to their defaults.
    pub(super) fn restore_cursor(&mut self) {
        let slot = self.saved_slot();
        let (shape, blinking) = (self.cursor.shape, self.cursor.blinking);
        match self.saved_cursor[slot].clone() {
            Some(saved) => {
                self.cursor = saved;
                let row = self.cursor.row.min(self.height() - 1);
                let col = self.cursor.col.min(self.width() - 1);
                self.cursor.row = row;
                self.cursor.col = col;
            },
            None => {
                self.cursor.set_position(0, 0);
                self.cursor.charsets.reset();
                self.cursor.style = Style::default();
                self.cursor.origin_mode = false;
            },
        }
        self.cursor.shape = shape;
        self.cursor.blinking = blinking;
    }

    // ---- Screens ----

    /// Switch between the primary and alternate screen. The alternate
    /// screen is cleared on entry.
    pub(super) fn switch_screen(&mut self, alternate: bool) {
        if self.alternate_active == alternate {
            return;
        }
        self.alternate_active = alternate;
        if alternate {
            self.alternate.clear_selection();
            let (row, col) = (self.cursor.row, self.cursor.col.min(self.alternate.width() - 1));
            self.alternate.erase_display(row, col, crate::core::EraseMode::All, false);
        }
        self.buffer_mut().mark_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{term, text};
    use super::super::Terminal;

    #[test]
    fn test_cursor_movement_clamps() {
        let mut terminal = term();
        terminal.process(b"\x1b[5;5H\x1b[100A");
        assert_eq!(terminal.cursor_state().row, 0);
        terminal.process(b"\x1b[100B\x1b[100C");
        assert_eq!((terminal.cursor_state().row, terminal.cursor_state().col), (23, 79));
        terminal.process(b"\x1b[3D");
        assert_eq!(terminal.cursor_state().col, 76);
    }

    #[test]
    fn test_cup_is_one_based() {
        let mut terminal = term();
        terminal.process(b"\x1b[10;20H");
        assert_eq!((terminal.cursor_state().row, terminal.cursor_state().col), (9, 19));
        terminal.process(b"\x1b[H");
        assert_eq!((terminal.cursor_state().row, terminal.cursor_state().col), (0, 0));
    }

    #[test]
    fn test_origin_mode_addressing() {
        let mut terminal = term();
        terminal.process(b"\x1b[5;10r\x1b[?6h");
        assert_eq!(terminal.cursor_state().row, 4);
        terminal.process(b"\x1b[2;3H");
        assert_eq!((terminal.cursor_state().row, terminal.cursor_state().col), (5, 2));
        terminal.process(b"\x1b[50;1H");
        assert_eq!(terminal.cursor_state().row, 9);
    }

    #[test]
    fn test_cursor_up_stops_at_top_margin() {
        let mut terminal = term();
        terminal.process(b"\x1b[5;10r\x1b[7;1H\x1b[10A");
        assert_eq!(terminal.cursor_state().row, 4);
        terminal.process(b"\x1b[2;1H\x1b[A");
        assert_eq!(terminal.cursor_state().row, 0);
    }

    #[test]
    fn test_scroll_region_linefeed() {
        let mut terminal = Terminal::new(10, 5);
        terminal.process(b"top\x1b[2;4r\x1b[2;1Ha\r\nb\r\nc\r\nd");
        assert_eq!(text(&terminal, 0), "top");
        assert_eq!(text(&terminal, 1), "b");
        assert_eq!(text(&terminal, 3), "d");
        assert_eq!(terminal.buffer().buffered(), 0);
    }

    #[test]
    fn test_reverse_index_scrolls_down() {
        let mut terminal = Terminal::new(10, 3);
        terminal.process(b"a\r\nb\x1b[H\x1bM");
        assert_eq!(text(&terminal, 0), "");
        assert_eq!(text(&terminal, 1), "a");
        assert_eq!(text(&terminal, 2), "b");
    }

    #[test]
    fn test_tabs() {
        let mut terminal = term();
        terminal.process(b"\tx");
        assert_eq!(terminal.cursor_state().col, 9);
        terminal.process(b"\x1b[3g\x1b[1;4H\x1bH\r\t");
        assert_eq!(terminal.cursor_state().col, 3);
        terminal.process(b"\t");
        assert_eq!(terminal.cursor_state().col, 79);
        terminal.process(b"\x1b[Z");
        assert_eq!(terminal.cursor_state().col, 3);
    }

    #[test]
    fn test_backspace_from_pending_wrap() {
        let mut terminal = Terminal::new(10, 2);
        terminal.process(b"0123456789\x08");
        assert_eq!(terminal.cursor_state().col, 8);
        assert!(!terminal.cursor_state().pending_wrap);
    }

    #[test]
    fn test_save_restore_cursor() {
        let mut terminal = term();
        terminal.process(b"\x1b[5;5H\x1b[1m\x1b7\x1b[H\x1b[0m\x1b8");
        let cursor = terminal.cursor_state();
        assert_eq!((cursor.row, cursor.col), (4, 4));
        assert!(cursor.style.contains(crate::core::Attrs::BOLD));
    }

    #[test]
    fn test_restore_without_save_homes() {
        let mut terminal = term();
        terminal.process(b"\x1b[5;5H\x1b[1m\x1b(0\x1b8");
        let cursor = terminal.cursor_state();
        assert_eq!((cursor.row, cursor.col), (0, 0));
        assert!(cursor.style.is_default());
        assert_eq!(cursor.charsets, crate::core::CharsetState::default());
    }

    #[test]
    fn test_alternate_screen_1049() {
        let mut terminal = term();
        terminal.process(b"primary\x1b[?1049h");
        assert!(terminal.is_alternate_screen());
        assert_eq!(text(&terminal, 0), "");
        terminal.process(b"alt\x1b[?1049l");
        assert!(!terminal.is_alternate_screen());
        assert_eq!(text(&terminal, 0), "primary");
        assert_eq!(terminal.cursor_state().col, 7);
    }

    #[test]
    fn test_insert_mode() {
        let mut terminal = term();
        terminal.process(b"world\r\x1b[4hhello \x1b[4l");
        assert_eq!(text(&terminal, 0), "hello world");
    }

    #[test]
    fn test_left_right_margins_wrap() {
        let mut terminal = Terminal::new(10, 3);
        terminal.process(b"\x1b[?69h\x1b[3;6s\x1b[1;3Habcdef");
        assert_eq!(text(&terminal, 0), "  abcd");
        assert_eq!(text(&terminal, 1), "  ef");
    }

    #[test]
    fn test_back_and_forward_index() {
        let mut terminal = Terminal::new(5, 1);
        terminal.process(b"abcde\r\x1b6");
        assert_eq!(text(&terminal, 0), " abcd");
        terminal.process(b"\x1b[5G\x1b9");
        assert_eq!(text(&terminal, 0), "abcd");
    }
}
