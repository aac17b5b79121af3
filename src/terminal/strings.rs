//! Operating system commands, device control strings and APC transfers

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, warn};

use super::{Terminal, TerminalEvent};
use crate::core::{Attrs, Color, Style};
use crate::parser::DcsCommand;

impl Terminal {
    /// Dispatch an OSC string
    pub(super) fn osc(&mut self, number: u32, payload: &str) {
        match number {
            0..=2 => {
                // Icon name and window title
                let title: String = payload
                    .chars()
                    .map(|c| if c.is_control() { '_' } else { c })
                    .collect();
                self.title = title.clone();
                self.events.push(TerminalEvent::TitleChanged(title));
            },
            8 => self.set_hyperlink(payload),
            10 | 11 => {
                if payload != "?" {
                    debug!("setting OSC {number} colors is not supported");
                    return;
                }
                let (r, g, b) = if number == 10 {
                    self.config.colors.foreground
                } else {
                    self.config.colors.background
                };
                let reply = format!("\x1b]{number};rgb:{r:02x}{r:02x}/{g:02x}{g:02x}/{b:02x}{b:02x}\x1b\\");
                self.send(reply.as_bytes());
            },
            52 => self.clipboard(payload),
            _ => debug!("unhandled OSC {number}"),
        }
    }

    /// OSC 8: `params;uri`, an empty uri ends the link
    fn set_hyperlink(&mut self, payload: &str) {
        let Some((params, uri)) = payload.split_once(';') else {
            debug!("malformed OSC 8");
            return;
        };
        if uri.is_empty() {
            self.link = 0;
            return;
        }
        let id = params
            .split(':')
            .find_map(|param| param.strip_prefix("id="))
            .unwrap_or("");
        self.link = self.screen_mut().add_hyperlink(uri, id);
    }

    /// OSC 52: `target;data` where data is base64 or `?`
    fn clipboard(&mut self, payload: &str) {
        let (target, data) = payload.split_once(';').unwrap_or(("c", payload));
        if data == "?" {
            let reply = format!("\x1b]52;{target};\x1b\\");
            self.send(reply.as_bytes());
            return;
        }
        match STANDARD.decode(data) {
            Ok(bytes) => self.events.push(TerminalEvent::ClipboardSet(bytes)),
            Err(err) => warn!("invalid OSC 52 payload: {err}"),
        }
    }

    /// Dispatch a completed DCS
    pub(super) fn dcs(&mut self, command: DcsCommand) {
        match command {
            DcsCommand::UserDefinedKeys { clear, lock, keys } => {
                // DECUDK
                if self.udk_locked {
                    debug!("user defined keys are locked");
                    return;
                }
                let table = match self.udk.take() {
                    Some(mut table) if !clear => {
                        table.extend(keys);
                        table
                    },
                    _ => keys.into_iter().collect(),
                };
                self.udk = Some(table);
                self.udk_locked = lock;
            },
            DcsCommand::RequestSettings(request) => self.request_setting(&request),
        }
    }

    /// DECRQSS: report the current value of a setting
    fn request_setting(&mut self, request: &[u8]) {
        if self.modes.conformance_level < 4 {
            debug!("DECRQSS needs level 4");
            return;
        }
        let value = match request {
            b"m" => Some(sgr_report(&self.cursor.style)),
            b"$}" => Some("0".to_string()),
            b"*x" => Some(if self.modes.rectangle_extent { "2" } else { "1" }.to_string()),
            b"\"q" => Some(if self.cursor.style.contains(Attrs::UNERASABLE) { "1" } else { "0" }.to_string()),
            b"$|" => Some(self.primary.width().to_string()),
            b"\"p" => Some(if self.modes.conformance_level >= 2 {
                format!("6{};{}", self.modes.conformance_level, u8::from(!self.modes.c1_8bit))
            } else {
                "61".to_string()
            }),
            b" q" => Some(self.cursor.style_param().to_string()),
            b"s" => Some(format!("{};{}", self.margins.left + 1, self.margins.right + 1)),
            b"t" | b"*|" => Some(self.primary.height().to_string()),
            b"$~" => Some(self.status_display.to_string()),
            b"r" => Some(format!("{};{}", self.margins.top + 1, self.margins.bottom + 1)),
            _ => None,
        };

        let mut reply = match value {
            Some(value) => format!("\x1bP1$r{value}").into_bytes(),
            None => b"\x1bP0$r".to_vec(),
        };
        reply.extend_from_slice(request);
        reply.extend_from_slice(b"\x1b\\");
        self.send(&reply);
    }

    /// Dispatch an APC file transfer request
    pub(super) fn apc(&mut self, number: u32, payload: &str) {
        let path = match STANDARD.decode(payload) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                warn!("invalid APC {number} payload: {err}");
                return;
            },
        };
        match number {
            7 => self.events.push(TerminalEvent::DownloadFile(path)),
            8 => self.events.push(TerminalEvent::UploadFile(path)),
            _ => debug!("unhandled APC {number}"),
        }
    }
}

/// SGR parameters that recreate a style from the default
fn sgr_report(style: &Style) -> String {
    let mut params = vec!["0".to_string()];
    for (attr, code) in [
        (Attrs::BOLD, "1"),
        (Attrs::UNDERLINE, "4"),
        (Attrs::BLINK, "5"),
        (Attrs::INVERSE, "7"),
        (Attrs::INVISIBLE, "8"),
    ] {
        if style.contains(attr) {
            params.push(code.to_string());
        }
    }
    for (color, base) in [(style.fg, 30), (style.bg, 40)] {
        match color {
            Color::Default => {},
            Color::Indexed(n) if n < 8 => params.push((base + u32::from(n)).to_string()),
            Color::Indexed(n) if n < 16 => params.push((base + 60 + u32::from(n) - 8).to_string()),
            Color::Indexed(n) => params.push(format!("{};5;{n}", base + 8)),
            Color::Rgb(r, g, b) => params.push(format!("{};2;{r};{g};{b}", base + 8)),
        }
    }
    params.join(";")
}
