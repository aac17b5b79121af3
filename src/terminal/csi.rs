//! Control sequence dispatch
//!
//! Sequences are resolved through the command tables for the current
//! conformance level. Unknown tags are dropped without touching state.

use tracing::debug;

use super::Terminal;
use crate::core::{Attrs, Cell, Charset, Color, EraseMode, Margins, Style};
use crate::parser::{CsiCommand, CsiSequence};

/// Attributes DECCARA and DECRARA work on
const RENDITION: Attrs = Attrs::BOLD
    .union(Attrs::UNDERLINE)
    .union(Attrs::BLINK)
    .union(Attrs::INVERSE);

/// An inclusive rectangle of screen cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rect {
    top: usize,
    left: usize,
    bottom: usize,
    right: usize,
}

impl Terminal {
    pub(super) fn csi(&mut self, seq: &CsiSequence) {
        let Some(command) = self.commands.lookup(seq.tag, self.modes.conformance_level) else {
            debug!("unknown CSI {:?} {:?}", String::from_utf8_lossy(&seq.tag.bytes()), seq.params);
            return;
        };

        let n = seq.count(0);
        match command {
            // Cursor motion
            CsiCommand::Cuu => {
                // CUU - Cursor Up
                self.cursor_up(n);
            }
            CsiCommand::Cud => {
                // CUD - Cursor Down
                self.cursor_down(n);
            }
            CsiCommand::Cuf | CsiCommand::Hpr => {
                // CUF - Cursor Forward, HPR - Horizontal Position Relative
                self.cursor_right(n);
            }
            CsiCommand::Cub => {
                // CUB - Cursor Backward
                self.cursor_left(n);
            }
            CsiCommand::Cnl => {
                // CNL - Cursor Next Line
                for _ in 0..n {
                    self.newline();
                }
            }
            CsiCommand::Cpl => {
                // CPL - Cursor Previous Line
                self.carriage_return();
                self.cursor_up(n);
            }
            CsiCommand::Cha | CsiCommand::Hpa => {
                // CHA - Cursor Character Absolute, HPA
                self.move_to_column(n - 1);
            }
            CsiCommand::Cup | CsiCommand::Hvp => {
                // CUP - Cursor Position, HVP
                self.move_to(n - 1, seq.count(1) - 1);
            }
            CsiCommand::Vpa => {
                // VPA - Vertical Position Absolute
                self.move_to_row(n - 1);
            }
            CsiCommand::Vpr => {
                // VPR - Vertical Position Relative
                self.cursor_down(n);
            }
            CsiCommand::Cht => self.tab(n),
            CsiCommand::Cbt => self.back_tab(n),
            CsiCommand::Tbc => match seq.param(0) {
                0 => {
                    let col = self.cursor.col;
                    if let Some(stop) = self.tab_stops.get_mut(col) {
                        *stop = false;
                    }
                }
                3 => self.tab_stops.fill(false),
                _ => {}
            },

            // Editing
            CsiCommand::Ed | CsiCommand::Decsed => {
                // ED - Erase in Display, DECSED - Selective Erase in Display
                let selective = command == CsiCommand::Decsed;
                if let Some(mode) = EraseMode::from_param(seq.param(0)) {
                    let (row, col) = self.cursor_cell();
                    self.screen_mut().erase_display(row, col, mode, selective);
                }
            }
            CsiCommand::El | CsiCommand::Decsel => {
                // EL - Erase in Line, DECSEL - Selective Erase in Line
                let selective = command == CsiCommand::Decsel;
                if let Some(mode) = EraseMode::from_param(seq.param(0)) {
                    let (row, col) = self.cursor_cell();
                    self.screen_mut().erase_line(row, col, mode, selective);
                }
            }
            CsiCommand::Ech => {
                // ECH - Erase Characters
                let (row, col) = self.cursor_cell();
                self.screen_mut().erase_character(row, col, n);
            }
            CsiCommand::Il | CsiCommand::Dl => {
                // IL - Insert Lines, DL - Delete Lines
                let region = self.region();
                if region.contains(self.cursor.row, self.cursor.col) {
                    let top = self.cursor.row;
                    let count = n.min(region.bottom - top + 1);
                    let buffer = self.screen_mut();
                    for _ in 0..count {
                        if command == CsiCommand::Il {
                            buffer.scroll_backward(top, region.bottom, region.left, region.right);
                        } else {
                            buffer.scroll_forward(top, region.bottom, region.left, region.right);
                        }
                    }
                    // Bottom row of a single line region
                    if top == region.bottom {
                        let col = region.left;
                        let end = region.right - region.left + 1;
                        buffer.erase_character(top, col, end);
                    }
                    self.carriage_return();
                }
            }
            CsiCommand::Ich | CsiCommand::Dch => {
                // ICH - Insert Characters, DCH - Delete Characters
                let region = self.region();
                if region.contains(self.cursor.row, self.cursor.col) {
                    let (row, col) = self.cursor_cell();
                    let count = n.min(region.right - col + 1);
                    let buffer = self.screen_mut();
                    for _ in 0..count {
                        if command == CsiCommand::Ich {
                            buffer.insert_character(row, col, region.right);
                        } else {
                            buffer.delete_character(row, col, region.right);
                        }
                    }
                    self.cursor.pending_wrap = false;
                }
            }
            CsiCommand::Decic | CsiCommand::Decdc => {
                // DECIC - Insert Column, DECDC - Delete Column
                let region = self.region();
                if region.contains(self.cursor.row, self.cursor.col) {
                    let col = self.cursor.col;
                    let count = n.min(region.right - col + 1);
                    let buffer = self.screen_mut();
                    for _ in 0..count {
                        for row in region.top..=region.bottom {
                            if command == CsiCommand::Decic {
                                buffer.insert_character(row, col, region.right);
                            } else {
                                buffer.delete_character(row, col, region.right);
                            }
                        }
                    }
                }
            }
            CsiCommand::Su => {
                // SU - Scroll Up
                for _ in 0..n.min(self.height()) {
                    self.scroll(true);
                }
            }
            CsiCommand::Sd => {
                // SD - Scroll Down
                for _ in 0..n.min(self.height()) {
                    self.scroll(false);
                }
            }
            CsiCommand::Sl => self.shift_columns(n, true),
            CsiCommand::Sr => self.shift_columns(n, false),
            CsiCommand::Rep => {
                // REP - Repeat preceding character
                if let Some(ch) = self.last_char {
                    for _ in 0..n.min(u16::MAX as usize) {
                        self.write_char(ch);
                    }
                }
            }

            // Modes
            CsiCommand::Sm | CsiCommand::Rm => {
                let set = command == CsiCommand::Sm;
                for &id in &seq.params {
                    self.set_mode(id, true, set);
                }
            }
            CsiCommand::DecSet | CsiCommand::DecReset => {
                let set = command == CsiCommand::DecSet;
                for &id in &seq.params {
                    self.set_mode(id, false, set);
                }
            }
            CsiCommand::SaveModes => {
                for &id in &seq.params {
                    if let Some(value) = self.get_mode(id, false) {
                        self.modes.save(id, value);
                    }
                }
            }
            CsiCommand::RestoreModes => {
                for &id in &seq.params {
                    if let Some(value) = self.modes.saved(id) {
                        self.set_mode(id, false, value);
                    }
                }
            }

            // Rendition
            CsiCommand::Sgr => self.select_graphic_rendition(&seq.params),
            CsiCommand::XtermKeyModifiers => {
                debug!("xterm key modifier options ignored");
            }

            // Margins and cursor save
            CsiCommand::Decstbm => {
                // DECSTBM - Set Top and Bottom Margins
                let height = self.primary.height();
                let top = seq.param_or(0, 1) as usize;
                // Ignored unless at least two lines remain
                let bottom = (seq.param_or(1, height as u32) as usize).min(height);
                if bottom > top {
                    self.margins.top = top - 1;
                    self.margins.bottom = bottom - 1;
                    self.move_to(0, 0);
                }
            }
            CsiCommand::Decslrm => {
                // DECSLRM - Set Left and Right Margins, SCOSC without DECLRMM
                if self.modes.left_right_margins {
                    let width = self.primary.width();
                    let left = seq.param_or(0, 1) as usize;
                    let right = (seq.param_or(1, width as u32) as usize).min(width);
                    if right > left {
                        self.margins.left = left - 1;
                        self.margins.right = right - 1;
                        self.move_to(0, 0);
                    }
                } else {
                    self.save_cursor();
                }
            }
            CsiCommand::Scosc => self.save_cursor(),
            CsiCommand::Scorc => self.restore_cursor(),

            // Reports
            CsiCommand::Da1 => {
                if seq.param(0) == 0 {
                    self.send(b"\x1b[?64;1;2;6;8;9c");
                }
            }
            CsiCommand::Da2 => self.send(b"\x1b[>64;278;1c"),
            CsiCommand::Da3 => self.send(b"\x1bP!|00000000\x1b\\"),
            CsiCommand::Dsr => self.device_status(seq.param(0), false),
            CsiCommand::DsrDec => self.device_status(seq.param(0), true),
            CsiCommand::Decreqtparm => {
                // DECREQTPARM - Request Terminal Parameters
                let reply = format!("\x1b[{};1;1;128;128;1;0x", seq.param(0) + 2);
                self.send(reply.as_bytes());
            }
            CsiCommand::Decrqm | CsiCommand::DecrqmDec => {
                // DECRQM - Request Mode
                let ansi = command == CsiCommand::Decrqm;
                let id = seq.param(0);
                let state = match self.get_mode(id, ansi) {
                    Some(true) => 1,
                    Some(false) => 2,
                    None => 0,
                };
                let prefix = if ansi { "" } else { "?" };
                let reply = format!("\x1b[{prefix}{id};{state}$y");
                self.send(reply.as_bytes());
            }
            CsiCommand::Decrqde => {
                // DECRQDE - Request Displayed Extent
                let (width, height) = self.terminal_size();
                let reply = format!("\x1b[{height};{width};1;1;1\"w");
                self.send(reply.as_bytes());
            }
            CsiCommand::Decrqpsr => self.presentation_state(seq.param(0)),
            CsiCommand::Decrqupss => {
                // DECRQUPSS - user preferred supplemental set is Latin-1
                self.send(b"\x1bP0!u%5\x1b\\");
            }

            // Terminal setup
            CsiCommand::Decscl => {
                // DECSCL - Select Conformance Level
                let level = seq.param(0);
                if (61..=65).contains(&level) {
                    self.modes.conformance_level = (level - 60) as u8;
                    if level == 61 {
                        self.modes.c1_8bit = false;
                    } else {
                        match seq.params.get(1) {
                            None | Some(0) | Some(2) => self.modes.c1_8bit = true,
                            Some(1) => self.modes.c1_8bit = false,
                            Some(_) => {}
                        }
                    }
                }
            }
            CsiCommand::Decstr => self.soft_reset(),
            CsiCommand::Decscusr => self.cursor.set_style(seq.param(0)),
            CsiCommand::Deccolm => {
                // DECSCPP - Select Columns Per Page
                let cols = seq.param_or(0, 80) as usize;
                if cols > 10 && cols < 1000 {
                    let rows = self.primary.height();
                    self.host_resize(cols, rows);
                    self.modes.left_right_margins = false;
                    self.margins.left = 0;
                    self.margins.right = self.primary.width() - 1;
                }
            }
            CsiCommand::Decsnls => {
                // DECSNLS - Select Number of Lines per Screen
                let rows = seq.param(0) as usize;
                if (24..250).contains(&rows) {
                    let cols = self.primary.width();
                    self.host_resize(cols, rows);
                }
            }
            CsiCommand::Window => self.window_operation(seq),
            CsiCommand::Decsca => match seq.param(0) {
                // DECSCA - Select Character Protection Attribute
                1 => self.cursor.style.set(Attrs::UNERASABLE),
                0 | 2 => self.cursor.style.clear(Attrs::UNERASABLE),
                _ => {}
            },
            CsiCommand::Decssdt => {
                // DECSSDT - Select Status Display Type
                self.status_display = seq.params.first().copied().unwrap_or(1).min(2);
                if self.status_display != 2 {
                    self.leave_status_line();
                }
                self.status.mark_dirty();
            }
            CsiCommand::Decsasd => {
                // DECSASD - Select Active Status Display
                if seq.param(0) != 0 {
                    if !self.status_active && self.status_display == 2 {
                        self.saved_status = Some(self.cursor.clone());
                        self.cursor.reset();
                        self.status_active = true;
                    }
                } else {
                    self.leave_status_line();
                }
            }

            // Rectangles
            CsiCommand::Decfra => {
                // DECFRA - Fill Rectangular Area
                let code = seq.param_or(0, u32::from(b' '));
                let printable = (0x20..0x7F).contains(&code) || (0xA0..=0xFF).contains(&code);
                if let (true, Some(ch)) = (printable, char::from_u32(code)) {
                    let rect = self.rect_param(seq, 1);
                    let fill = Cell::new(ch, self.cursor.style);
                    self.fill_rectangle(rect, fill);
                }
            }
            CsiCommand::Decera => {
                // DECERA - Erase Rectangular Area
                let rect = self.rect_param(seq, 0);
                let fill = Cell::new(' ', self.cursor.style);
                self.fill_rectangle(rect, fill);
            }
            CsiCommand::Decsera => {
                // DECSERA - Selective Erase Rectangular Area
                let rect = self.rect_param(seq, 0);
                self.screen_mut()
                    .for_each_in_rectangle(rect.top, rect.left, rect.bottom, rect.right, |_, _, cell| {
                        if cell.is_erasable(true) {
                            cell.ch = ' ';
                        }
                    });
            }
            CsiCommand::Deccra => self.copy_rectangle(seq),
            CsiCommand::Deccara => {
                // DECCARA - Change Attributes in Rectangular Area
                let rect = self.rect_param(seq, 0);
                for &arg in seq.params.iter().skip(4) {
                    let (set, clear) = match arg {
                        0 => (Attrs::empty(), RENDITION),
                        1 => (Attrs::BOLD, Attrs::empty()),
                        4 => (Attrs::UNDERLINE, Attrs::empty()),
                        5 => (Attrs::BLINK, Attrs::empty()),
                        7 => (Attrs::INVERSE, Attrs::empty()),
                        21 | 22 => (Attrs::empty(), Attrs::BOLD),
                        24 => (Attrs::empty(), Attrs::UNDERLINE),
                        25 => (Attrs::empty(), Attrs::BLINK),
                        27 => (Attrs::empty(), Attrs::INVERSE),
                        _ => continue,
                    };
                    self.change_attributes(rect, |style| {
                        style.set(set);
                        style.clear(clear);
                    });
                }
            }
            CsiCommand::Decrara => {
                // DECRARA - Reverse Attributes in Rectangular Area
                let rect = self.rect_param(seq, 0);
                for &arg in seq.params.iter().skip(4) {
                    let flip = match arg {
                        0 => RENDITION,
                        1 => Attrs::BOLD,
                        4 => Attrs::UNDERLINE,
                        5 => Attrs::BLINK,
                        7 => Attrs::INVERSE,
                        _ => continue,
                    };
                    self.change_attributes(rect, |style| style.toggle(flip));
                }
            }
            CsiCommand::Decsace => {
                // DECSACE - Select Attribute Change Extent
                self.modes.rectangle_extent = seq.param(0) == 2;
            }
        }
    }

    /// Cursor position clamped onto the grid
    pub(super) fn cursor_cell(&self) -> (usize, usize) {
        (self.cursor.row, self.cursor.col.min(self.width() - 1))
    }

    // ---- Modes ----

    /// SM/RM and DECSET/DECRST for one mode
    pub(super) fn set_mode(&mut self, id: u32, ansi: bool, value: bool) {
        if ansi {
            if !self.modes.set(id, true, value) {
                debug!("ignored ANSI mode {id}");
            }
            return;
        }
        match id {
            3 => {
                // DECCOLM
                self.status_display = 0;
                self.leave_status_line();
                let rows = self.primary.height();
                self.host_resize(if value { 132 } else { 80 }, rows);
                self.margins.left = 0;
                self.margins.right = self.primary.width() - 1;
            }
            6 => {
                // DECOM
                self.cursor.origin_mode = value;
                self.move_to(0, 0);
            }
            7 => self.cursor.autowrap = value,
            12 => self.cursor.blinking = value,
            47 | 1047 => self.switch_screen(value),
            1048 => {
                if value {
                    self.save_cursor();
                } else {
                    self.restore_cursor();
                }
            }
            1049 => {
                if value {
                    self.save_cursor();
                    self.switch_screen(true);
                } else {
                    self.switch_screen(false);
                    self.restore_cursor();
                }
            }
            69 => {
                // DECLRMM
                self.modes.left_right_margins = value;
                if !value {
                    self.margins.left = 0;
                    self.margins.right = self.primary.width() - 1;
                }
            }
            _ => {
                if !self.modes.set(id, false, value) {
                    debug!("ignored DEC mode {id}");
                }
            }
        }
    }

    /// Current value of a mode; `None` when the mode is unknown
    pub(super) fn get_mode(&self, id: u32, ansi: bool) -> Option<bool> {
        if ansi {
            return self.modes.get(id, true);
        }
        match id {
            3 => Some(self.primary.width() == 132),
            6 => Some(self.cursor.origin_mode),
            7 => Some(self.cursor.autowrap),
            12 => Some(self.cursor.blinking),
            47 | 1047 | 1049 => Some(self.alternate_active),
            _ => self.modes.get(id, false),
        }
    }

    // ---- Rendition ----

    /// SGR: apply parameters left to right to the in-progress style
    pub(super) fn select_graphic_rendition(&mut self, params: &[u32]) {
        if params.is_empty() {
            self.cursor.style.reset();
            self.screen_mut().set_erase_colors(Color::Default, Color::Default);
            return;
        }

        let mut colors_changed = false;
        let mut i = 0;
        while i < params.len() {
            let style = &mut self.cursor.style;
            match params[i] {
                0 => {
                    style.reset();
                    self.screen_mut().set_erase_colors(Color::Default, Color::Default);
                }
                1 => style.set(Attrs::BOLD),
                4 => style.set(Attrs::UNDERLINE),
                5 => style.set(Attrs::BLINK),
                7 => style.set(Attrs::INVERSE),
                8 => style.set(Attrs::INVISIBLE),
                22 => style.clear(Attrs::BOLD),
                24 => style.clear(Attrs::UNDERLINE),
                25 => style.clear(Attrs::BLINK),
                27 => style.clear(Attrs::INVERSE),
                28 => style.clear(Attrs::INVISIBLE),
                p @ 30..=37 => {
                    style.set_fg(Color::Indexed((p - 30) as u8));
                    colors_changed = true;
                }
                p @ 90..=97 => {
                    style.set_fg(Color::Indexed((p - 90 + 8) as u8));
                    colors_changed = true;
                }
                39 => {
                    style.set_fg(Color::Default);
                    colors_changed = true;
                }
                p @ 40..=47 => {
                    style.set_bg(Color::Indexed((p - 40) as u8));
                    colors_changed = true;
                }
                p @ 100..=107 => {
                    style.set_bg(Color::Indexed((p - 100 + 8) as u8));
                    colors_changed = true;
                }
                49 => {
                    style.set_bg(Color::Default);
                    colors_changed = true;
                }
                p @ (38 | 48) => {
                    let (color, used) = extended_color(&params[i + 1..]);
                    i += used;
                    if let Some(color) = color {
                        if p == 38 {
                            style.set_fg(color);
                        } else {
                            style.set_bg(color);
                        }
                        colors_changed = true;
                    }
                }
                p => debug!("unsupported SGR {p}"),
            }
            i += 1;
        }

        if colors_changed {
            let Style { fg, bg, .. } = self.cursor.style;
            self.screen_mut().set_erase_colors(fg, bg);
        }
    }

    // ---- Reports ----

    fn device_status(&mut self, request: u32, dec: bool) {
        let locked = u8::from(self.udk_locked);
        let (row, col) = self.report_position();
        let reply = match (request, dec) {
            (5, false) => "\x1b[0n".to_string(),
            (6, false) => format!("\x1b[{row};{col}R"),
            (6, true) => format!("\x1b[?{row};{col};1R"),
            (15, false) => "\x1b[?13n".to_string(),
            (15, true) => "\x1b[?11n".to_string(),
            (25, _) => format!("\x1b[?2{locked}n"),
            (26, false) => "\x1b[?27;0n".to_string(),
            (26, true) => "\x1b[?27;1n".to_string(),
            (53, true) => "\x1b[?50n".to_string(),
            _ => {
                debug!("unanswered DSR {request}");
                return;
            }
        };
        self.send(reply.as_bytes());
    }

    /// 1-based cursor position, relative to the margins in origin mode
    fn report_position(&self) -> (usize, usize) {
        let (mut row, mut col) = self.cursor_cell();
        if self.cursor.origin_mode {
            let region = self.region();
            row = row.saturating_sub(region.top);
            col = col.saturating_sub(region.left);
        }
        (row + 1, col + 1)
    }

    /// DECRQPSR: DECCIR (1) or DECTABSR (2)
    fn presentation_state(&mut self, request: u32) {
        match request {
            1 => {
                let (row, col) = self.report_position();
                let style = self.cursor.style;
                let charsets = self.cursor.charsets;
                let bit = |attr: Attrs, value: u8| if style.contains(attr) { value } else { 0 };
                let rendition = 0x40
                    + bit(Attrs::INVERSE, 8)
                    + bit(Attrs::BLINK, 4)
                    + bit(Attrs::UNDERLINE, 2)
                    + bit(Attrs::BOLD, 1);
                let protection = 0x40 + bit(Attrs::UNERASABLE, 1);
                let flags = 0x40
                    + if self.cursor.autowrap { 8 } else { 0 }
                    + if charsets.single_shift == 3 { 4 } else { 0 }
                    + if charsets.single_shift == 2 { 2 } else { 0 }
                    + u8::from(self.cursor.origin_mode);
                let sizes = 0x40
                    + charsets
                        .slots
                        .iter()
                        .enumerate()
                        .filter(|(_, charset)| **charset == Charset::Latin1)
                        .map(|(slot, _)| 1u8 << slot)
                        .sum::<u8>();
                let mut reply = format!(
                    "\x1bP1$u{row};{col};1;{};{};{};{};{};{}",
                    rendition as char, protection as char, flags as char, charsets.gl, charsets.gr, sizes as char,
                )
                .into_bytes();
                reply.extend_from_slice(&charsets.designators);
                reply.extend_from_slice(b"\x1b\\");
                self.send(&reply);
            }
            2 => {
                let stops: Vec<String> = self
                    .tab_stops
                    .iter()
                    .enumerate()
                    .filter(|(_, stop)| **stop)
                    .map(|(col, _)| (col + 1).to_string())
                    .collect();
                let reply = format!("\x1bP2$u{}\x1b\\", stops.join("/"));
                self.send(reply.as_bytes());
            }
            _ => debug!("unsupported DECRQPSR {request}"),
        }
    }

    /// Window manipulation and DECSLPP
    fn window_operation(&mut self, seq: &CsiSequence) {
        match seq.param(0) {
            11 => self.send(b"\x1b[1t"),
            18 => {
                let (width, height) = self.terminal_size();
                let reply = format!("\x1b[8;{height};{width}t");
                self.send(reply.as_bytes());
            }
            20 => self.send(b"\x1b]L\x1b\\"),
            21 => {
                let reply = format!("\x1b]l{}\x1b\\", self.title);
                self.send(reply.as_bytes());
            }
            _ => {
                // An explicit 0 is kept so xterm title stack requests
                // (22;0;0t, 23;0;0t) fall outside the accepted range
                let rows = seq.params.get(1).copied().unwrap_or(24) as usize;
                if (4..240).contains(&rows) {
                    let cols = self.primary.width();
                    self.host_resize(cols, rows);
                }
            }
        }
    }

    fn leave_status_line(&mut self) {
        if self.status_active {
            self.status_active = false;
            if let Some(saved) = self.saved_status.take() {
                self.cursor = saved;
            }
        }
    }

    // ---- Rectangles ----

    /// Rectangle parameters starting at `offset`, translated and clipped
    /// by origin mode
    fn rect_param(&self, seq: &CsiSequence, offset: usize) -> Rect {
        let (width, height) = (self.width(), self.height());
        let mut rect = Rect {
            top: seq.param_or(offset, 1) as usize - 1,
            left: seq.param_or(offset + 1, 1) as usize - 1,
            bottom: seq.param_or(offset + 2, height as u32) as usize - 1,
            right: seq.param_or(offset + 3, width as u32) as usize - 1,
        };
        if self.cursor.origin_mode {
            let region: Margins = self.region();
            rect.top = (rect.top + region.top).max(region.top);
            rect.left = (rect.left + region.left).max(region.left);
            rect.bottom = (rect.bottom + region.top).min(region.bottom);
            rect.right = (rect.right + region.left).min(region.right);
        }
        rect
    }

    fn fill_rectangle(&mut self, rect: Rect, fill: Cell) {
        self.screen_mut()
            .for_each_in_rectangle(rect.top, rect.left, rect.bottom, rect.right, |_, _, cell| *cell = fill);
    }

    /// Apply a style change over a rectangle, or over the character stream
    /// between its corners when DECSACE selects stream extent
    fn change_attributes<F>(&mut self, rect: Rect, change: F)
    where
        F: Fn(&mut Style),
    {
        let width = self.width();
        let stream = !self.modes.rectangle_extent;
        let buffer = self.screen_mut();
        if !stream || rect.top == rect.bottom {
            buffer.for_each_in_rectangle(rect.top, rect.left, rect.bottom, rect.right, |_, _, cell| {
                change(&mut cell.style)
            });
            return;
        }
        if rect.top > rect.bottom {
            return;
        }
        buffer.for_each_in_rectangle(rect.top, rect.left, rect.top, width - 1, |_, _, cell| change(&mut cell.style));
        if rect.bottom > rect.top + 1 {
            buffer.for_each_in_rectangle(rect.top + 1, 0, rect.bottom - 1, width - 1, |_, _, cell| {
                change(&mut cell.style)
            });
        }
        buffer.for_each_in_rectangle(rect.bottom, 0, rect.bottom, rect.right, |_, _, cell| change(&mut cell.style));
    }

    /// DECCRA: copy within page 1 through a temporary buffer
    fn copy_rectangle(&mut self, seq: &CsiSequence) {
        if seq.param_or(4, 1) != 1 || seq.param_or(7, 1) != 1 {
            return;
        }
        let src = self.rect_param(seq, 0);
        let (width, height) = (self.width(), self.height());
        let bottom = src.bottom.min(height - 1);
        let right = src.right.min(width - 1);
        if src.top > bottom || src.left > right {
            return;
        }

        let mut dest_top = seq.param_or(5, 1) as usize - 1;
        let mut dest_left = seq.param_or(6, 1) as usize - 1;
        if self.cursor.origin_mode {
            let region = self.region();
            dest_top += region.top;
            dest_left += region.left;
        }
        if dest_top >= height || dest_left >= width {
            return;
        }
        let rows = (bottom - src.top + 1).min(height - dest_top);
        let cols = (right - src.left + 1).min(width - dest_left);

        let mut cells = Vec::with_capacity(rows * cols);
        let buffer = self.screen_mut();
        buffer.for_each_in_rectangle(src.top, src.left, src.top + rows - 1, src.left + cols - 1, |_, _, cell| {
            cells.push(*cell)
        });
        let mut source = cells.into_iter();
        buffer.for_each_in_rectangle(dest_top, dest_left, dest_top + rows - 1, dest_left + cols - 1, |_, _, cell| {
            if let Some(copied) = source.next() {
                *cell = copied;
            }
        });
    }
}

/// Parse the tail of an SGR 38/48: `5;n` or `2;r;g;b`. Returns the color
/// and the number of parameters consumed.
fn extended_color(params: &[u32]) -> (Option<Color>, usize) {
    match params {
        [5, index, ..] => (u8::try_from(*index).ok().map(Color::Indexed), 2),
        [2, r, g, b, ..] => {
            let channel = |v: u32| v.min(255) as u8;
            (Some(Color::Rgb(channel(*r), channel(*g), channel(*b))), 4)
        }
        [5] | [2, ..] => (None, params.len()),
        _ => (None, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{term, text};
    use super::super::Terminal;
    use crate::core::{Attrs, Color};

    #[test]
    fn test_erase_display_and_line() {
        let mut terminal = Terminal::new(10, 3);
        terminal.process(b"aaaaa\r\nbbbbb\r\nccccc\x1b[2;3H\x1b[J");
        assert_eq!(text(&terminal, 0), "aaaaa");
        assert_eq!(text(&terminal, 1), "bb");
        assert_eq!(text(&terminal, 2), "");
        terminal.process(b"\x1b[1;3H\x1b[1K");
        assert_eq!(text(&terminal, 0), "   aa");
    }

    #[test]
    fn test_selective_erase() {
        let mut terminal = term();
        terminal.process(b"\x1b[1\"qkeep\x1b[0\"q gone\x1b[?2K");
        assert_eq!(text(&terminal, 0), "keep");
        terminal.process(b"\x1b[2K");
        assert_eq!(text(&terminal, 0), "");
    }

    #[test]
    fn test_insert_delete_characters() {
        let mut terminal = term();
        terminal.process(b"abcdef\x1b[1;2H\x1b[2@");
        assert_eq!(text(&terminal, 0), "a  bcdef");
        terminal.process(b"\x1b[3P");
        assert_eq!(text(&terminal, 0), "acdef");
        terminal.process(b"\x1b[2X");
        assert_eq!(text(&terminal, 0), "a  ef");
    }

    #[test]
    fn test_insert_delete_lines() {
        let mut terminal = Terminal::new(10, 4);
        terminal.process(b"1\r\n2\r\n3\r\n4\x1b[2;1H\x1b[L");
        assert_eq!(text(&terminal, 1), "");
        assert_eq!(text(&terminal, 2), "2");
        assert_eq!(text(&terminal, 3), "3");
        terminal.process(b"\x1b[2M");
        assert_eq!(text(&terminal, 1), "3");
        assert_eq!(text(&terminal, 2), "");
        assert_eq!(terminal.buffer().buffered(), 0);
    }

    #[test]
    fn test_insert_line_outside_region_ignored() {
        let mut terminal = Terminal::new(10, 4);
        terminal.process(b"1\r\n2\x1b[3;4r\x1b[1;1H\x1b[L");
        assert_eq!(text(&terminal, 0), "1");
        assert_eq!(text(&terminal, 1), "2");
    }

    #[test]
    fn test_scroll_up_down() {
        let mut terminal = Terminal::new(10, 3);
        terminal.process(b"1\r\n2\r\n3\x1b[S");
        assert_eq!(text(&terminal, 0), "2");
        assert_eq!(text(&terminal, -1), "1");
        terminal.process(b"\x1b[T");
        assert_eq!(text(&terminal, 0), "1");
        assert_eq!(terminal.buffer().buffered(), 0);
    }

    #[test]
    fn test_column_insert_delete() {
        let mut terminal = Terminal::new(6, 2);
        terminal.process(b"abcdef\r\nghijkl\x1b[1;2H\x1b['}");
        assert_eq!(text(&terminal, 0), "a bcde");
        assert_eq!(text(&terminal, 1), "g hijk");
        terminal.process(b"\x1b[2'~");
        assert_eq!(text(&terminal, 0), "acde");
    }

    #[test]
    fn test_shift_left_right() {
        let mut terminal = Terminal::new(6, 1);
        terminal.process(b"abcdef\x1b[2 @");
        assert_eq!(text(&terminal, 0), "cdef");
        terminal.process(b"\x1b[1 A");
        assert_eq!(text(&terminal, 0), " cdef");
    }

    #[test]
    fn test_repeat_character() {
        let mut terminal = term();
        terminal.process(b"x\x1b[4b");
        assert_eq!(text(&terminal, 0), "xxxxx");
    }

    #[test]
    fn test_cursor_visibility_mode() {
        let mut terminal = term();
        terminal.process(b"\x1b[?25l");
        assert!(!terminal.modes().cursor_visible);
        terminal.process(b"\x1b[?25h");
        assert!(terminal.modes().cursor_visible);
    }

    #[test]
    fn test_mode_save_restore() {
        let mut terminal = term();
        terminal.process(b"\x1b[?1h\x1b[?1s\x1b[?1l");
        assert!(!terminal.modes().cursor_keys_application);
        terminal.process(b"\x1b[?1r");
        assert!(terminal.modes().cursor_keys_application);
    }

    #[test]
    fn test_sgr_colors() {
        let mut terminal = term();
        terminal.process(b"\x1b[38;5;196;48;2;1;2;3ma\x1b[94;41mb\x1b[39;49mc");
        let a = terminal.buffer().cell(0, 0).unwrap().style;
        assert_eq!(a.fg, Color::Indexed(196));
        assert_eq!(a.bg, Color::Rgb(1, 2, 3));
        let b = terminal.buffer().cell(0, 1).unwrap().style;
        assert_eq!(b.fg, Color::BRIGHT_BLUE);
        assert_eq!(b.bg, Color::RED);
        let c = terminal.buffer().cell(0, 2).unwrap().style;
        assert!(c.is_default());
    }

    #[test]
    fn test_sgr_attributes() {
        let mut terminal = term();
        terminal.process(b"\x1b[1;4;5;7;8m\x1b[22;25mx");
        let style = terminal.buffer().cell(0, 0).unwrap().style;
        assert!(style.contains(Attrs::UNDERLINE | Attrs::INVERSE | Attrs::INVISIBLE));
        assert!(!style.contains(Attrs::BOLD));
        assert!(!style.contains(Attrs::BLINK));
    }

    #[test]
    fn test_background_color_erase() {
        let mut terminal = Terminal::new(10, 2);
        terminal.process(b"\x1b[44m\x1b[2K");
        assert_eq!(terminal.buffer().cell(0, 5).unwrap().style.bg, Color::BLUE);
        terminal.process(b"\x1b[0m\x1b[2K");
        assert_eq!(terminal.buffer().cell(0, 5).unwrap().style.bg, Color::Default);
    }

    #[test]
    fn test_device_attributes() {
        let mut terminal = term();
        terminal.process(b"\x1b[c");
        assert_eq!(terminal.take_output(), b"\x1b[?64;1;2;6;8;9c");
        terminal.process(b"\x1b[>c");
        assert_eq!(terminal.take_output(), b"\x1b[>64;278;1c");
        terminal.process(b"\x1b[=c");
        assert_eq!(terminal.take_output(), b"\x1bP!|00000000\x1b\\");
    }

    #[test]
    fn test_device_status_reports() {
        let mut terminal = term();
        terminal.process(b"\x1b[5n\x1b[3;7H\x1b[6n\x1b[?6n\x1b[?53n\x1b[?25n");
        assert_eq!(terminal.take_output(), b"\x1b[0n\x1b[3;7R\x1b[?3;7;1R\x1b[?50n\x1b[?20n");
    }

    #[test]
    fn test_request_mode() {
        let mut terminal = term();
        terminal.process(b"\x1b[4h\x1b[4$p\x1b[?7$p\x1b[?3$p\x1b[?9999$p");
        assert_eq!(terminal.take_output(), b"\x1b[4;1$y\x1b[?7;1$y\x1b[?3;2$y\x1b[?9999;0$y");
    }

    #[test]
    fn test_terminal_parameters_and_extent() {
        let mut terminal = term();
        terminal.process(b"\x1b[x\x1b[\"v");
        assert_eq!(terminal.take_output(), b"\x1b[2;1;1;128;128;1;0x\x1b[24;80;1;1;1\"w");
    }

    #[test]
    fn test_cursor_information_report() {
        let mut terminal = term();
        terminal.process(b"\x1b[2;3H\x1b[1;7m\x1b[1$w");
        assert_eq!(terminal.take_output(), b"\x1bP1$u2;3;1;I;@;H;0;2;@B0B0\x1b\\");
    }

    #[test]
    fn test_tab_stop_report() {
        let mut terminal = Terminal::new(20, 2);
        terminal.process(b"\x1b[2$w");
        assert_eq!(terminal.take_output(), b"\x1bP2$u9/17\x1b\\");
    }

    #[test]
    fn test_window_reports() {
        let mut terminal = term();
        terminal.process(b"\x1b]2;hi\x07\x1b[18t\x1b[21t");
        assert_eq!(terminal.take_output(), b"\x1b[8;24;80t\x1b]lhi\x1b\\");
    }

    #[test]
    fn test_conformance_level() {
        let mut terminal = term();
        terminal.process(b"\x1b[62;1\"p");
        assert_eq!(terminal.modes().conformance_level, 2);
        assert!(!terminal.modes().c1_8bit);
        terminal.process(b"\x1b[63\"p");
        assert!(terminal.modes().c1_8bit);
        terminal.process(b"\x1b[61\"p");
        assert_eq!(terminal.modes().conformance_level, 1);
        assert!(!terminal.modes().c1_8bit);
        // VT220 sequences are unknown at level 1
        terminal.process(b"abc\x1b[1;1H\x1b[@");
        assert_eq!(text(&terminal, 0), "abc");
    }

    #[test]
    fn test_unknown_csi_ignored() {
        let mut terminal = term();
        terminal.process(b"ab\x1b[5q");
        let before = terminal.snapshot();
        terminal.process(b"\x1b[5%y");
        assert!(before.content_equals(&terminal.snapshot()));
        assert_eq!(terminal.cursor_state().col, 2);
        terminal.process(b"c");
        assert_eq!(text(&terminal, 0), "abc");
    }

    #[test]
    fn test_deccolm_resizes_and_clears() {
        let mut terminal = term();
        terminal.process(b"text\x1b[?3h");
        assert_eq!(terminal.terminal_size(), (132, 24));
        assert_eq!(text(&terminal, 0), "");
        terminal.process(b"\x1b[?3$p");
        assert_eq!(terminal.take_output(), b"\x1b[?3;1$y");
        terminal.process(b"\x1b[100$|");
        assert_eq!(terminal.terminal_size(), (100, 24));
    }

    #[test]
    fn test_lines_per_screen() {
        let mut terminal = term();
        terminal.process(b"\x1b[36*|");
        assert_eq!(terminal.terminal_size(), (80, 36));
        terminal.process(b"\x1b[8*|");
        assert_eq!(terminal.terminal_size(), (80, 36));
    }

    #[test]
    fn test_fill_and_erase_rectangle() {
        let mut terminal = Terminal::new(6, 4);
        terminal.process(b"\x1b[88;2;2;3;4$x");
        assert_eq!(text(&terminal, 1), " XXX");
        assert_eq!(text(&terminal, 2), " XXX");
        assert_eq!(text(&terminal, 3), "");
        terminal.process(b"\x1b[2;3;2;3$z");
        assert_eq!(text(&terminal, 1), " X X");
    }

    #[test]
    fn test_selective_erase_rectangle() {
        let mut terminal = Terminal::new(6, 2);
        terminal.process(b"\x1b[1\"qab\x1b[0\"qcd\x1b[1;1;1;6${");
        assert_eq!(text(&terminal, 0), "ab");
    }

    #[test]
    fn test_copy_rectangle() {
        let mut terminal = Terminal::new(6, 4);
        terminal.process(b"ab\r\ncd\x1b[1;1;2;2;1;3;4;1$v");
        assert_eq!(text(&terminal, 2), "   ab");
        assert_eq!(text(&terminal, 3), "   cd");
    }

    #[test]
    fn test_change_attributes_rectangle() {
        let mut terminal = Terminal::new(6, 3);
        terminal.process(b"abcdef\r\nghijkl\x1b[2*x\x1b[1;2;2;3;1;4$r");
        let cell = |t: &Terminal, r, c| t.buffer().cell(r, c).unwrap().style;
        assert!(cell(&terminal, 0, 1).contains(Attrs::BOLD | Attrs::UNDERLINE));
        assert!(cell(&terminal, 1, 2).contains(Attrs::BOLD));
        assert!(!cell(&terminal, 0, 3).contains(Attrs::BOLD));
        terminal.process(b"\x1b[1;2;2;3;1$t");
        assert!(!cell(&terminal, 0, 1).contains(Attrs::BOLD));
    }

    #[test]
    fn test_change_attributes_stream_extent() {
        let mut terminal = Terminal::new(6, 3);
        terminal.process(b"\x1b[1;5;2;2;7$r");
        let inverse = |r, c| terminal.buffer().cell(r, c).unwrap().style.contains(Attrs::INVERSE);
        assert!(!inverse(0, 3));
        assert!(inverse(0, 4));
        assert!(inverse(0, 5));
        assert!(inverse(1, 0));
        assert!(inverse(1, 1));
        assert!(!inverse(1, 2));
    }

    #[test]
    fn test_status_line() {
        let mut terminal = term();
        assert!(terminal.status_line().is_none());
        terminal.process(b"main\x1b[2$~\x1b[1$}status\x1b[0$}!");
        let status = terminal.status_line().unwrap();
        assert_eq!(status.line_text(0).trim_end(), "status");
        assert_eq!(text(&terminal, 0), "main!");

        terminal.process(b"\x1b[0$~\x1bP$q$~\x1b\\");
        assert_eq!(terminal.take_output(), b"\x1bP1$r0$~\x1b\\");
        assert!(terminal.status_line().is_none());
    }

    #[test]
    fn test_title_stack_requests_leave_screen_alone() {
        let mut terminal = term();
        terminal.process(b"\x1b[8;10;40tkeep");
        assert_eq!(terminal.terminal_size(), (80, 10));
        terminal.process(b"\x1b[22;0;0t\x1b[23;0;0t");
        assert_eq!(terminal.terminal_size(), (80, 10));
        assert_eq!(text(&terminal, 0), "keep");
        assert_eq!(terminal.cursor_state().col, 4);
    }
}
