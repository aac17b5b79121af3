//! Configuration for the emulation engine
//!
//! The preferences the engine reads at session start and whenever they
//! change: geometry, scrollback capacity, encoding, answerback, the
//! default colors reported to OSC 10/11 queries and the local input
//! policy. Files are JSON or TOML, chosen by extension.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::Encoding;

/// Control character names accepted in `disallowed_paste_characters`
const CONTROL_NAMES: [(&str, u8); 33] = [
    ("NUL", 0x00),
    ("SOH", 0x01),
    ("STX", 0x02),
    ("ETX", 0x03),
    ("EOT", 0x04),
    ("ENQ", 0x05),
    ("ACK", 0x06),
    ("BEL", 0x07),
    ("BS", 0x08),
    ("HT", 0x09),
    ("LF", 0x0A),
    ("VT", 0x0B),
    ("FF", 0x0C),
    ("CR", 0x0D),
    ("SO", 0x0E),
    ("SI", 0x0F),
    ("DLE", 0x10),
    ("DC1", 0x11),
    ("DC2", 0x12),
    ("DC3", 0x13),
    ("DC4", 0x14),
    ("NAK", 0x15),
    ("SYN", 0x16),
    ("ETB", 0x17),
    ("CAN", 0x18),
    ("EM", 0x19),
    ("SUB", 0x1A),
    ("ESC", 0x1B),
    ("FS", 0x1C),
    ("GS", 0x1D),
    ("RS", 0x1E),
    ("US", 0x1F),
    ("DEL", 0x7F),
];

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial width in columns
    pub columns: usize,
    /// Initial height in rows
    pub rows: usize,
    /// Maximum scrollback lines
    pub scrollback_lines: usize,
    /// Interpretation of bytes above 0x7F
    pub encoding: Encoding,
    /// Sent in reply to ENQ, with CR and LF removed
    pub answerback: String,
    /// Initial state of bracketed paste (mode 2004)
    pub bracketed_paste: bool,
    /// Control characters replaced by a space when pasting
    pub disallowed_paste_characters: Vec<String>,
    /// Use the xterm key family instead of plain ANSI
    pub xterm_keys: bool,
    /// xterm legacy function key numbering
    pub old_fn_keys: bool,
    /// Alt+key sends ESC key instead of setting the 8th bit
    pub alt_sends_escape: bool,
    /// User defined keys fire on Shift+Fn instead of Fn
    pub udk_with_shift: bool,
    /// Extra characters treated as part of a word by double-click selection
    pub word_characters: String,
    pub cursor_block: bool,
    pub cursor_blink: bool,
    /// Show the host writable status line
    pub status_line: bool,
    /// Initial DECSCL level (1-5)
    pub conformance_level: u8,
    pub colors: ColorsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            columns: 80,
            rows: 24,
            scrollback_lines: 10000,
            encoding: Encoding::Utf8,
            answerback: String::new(),
            bracketed_paste: true,
            disallowed_paste_characters: ["BS", "DEL", "ENQ", "EOT", "ESC", "NUL"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            xterm_keys: true,
            old_fn_keys: false,
            alt_sends_escape: true,
            udk_with_shift: false,
            word_characters: "-./".to_string(),
            cursor_block: true,
            cursor_blink: false,
            status_line: false,
            conformance_level: 4,
            colors: ColorsConfig::default(),
        }
    }
}

/// Default colors reported to OSC 10 and 11 queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub foreground: (u8, u8, u8),
    pub background: (u8, u8, u8),
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            foreground: (229, 229, 229),
            background: (0, 0, 0),
        }
    }
}

impl Config {
    /// Load configuration from a `.toml` or `.json` file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = if is_toml(path) {
            toml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Save configuration, in the format matching the extension
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = if is_toml(path) {
            toml::to_string_pretty(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load `~/.config/mochi/vt.toml`, falling back to defaults
    pub fn load_or_default() -> Self {
        let Some(path) = default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("ignoring {}: {err}", path.display());
                Self::default()
            },
        }
    }

    /// Reject settings the engine cannot honour
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=1000).contains(&self.columns) {
            return Err(ConfigError::Invalid(format!("columns must be 1..=1000, got {}", self.columns)));
        }
        if !(1..=500).contains(&self.rows) {
            return Err(ConfigError::Invalid(format!("rows must be 1..=500, got {}", self.rows)));
        }
        if !(1..=5).contains(&self.conformance_level) {
            return Err(ConfigError::Invalid(format!(
                "conformance_level must be 1..=5, got {}",
                self.conformance_level
            )));
        }
        for name in &self.disallowed_paste_characters {
            if !name.eq_ignore_ascii_case("C0") && lookup_control(name).is_none() {
                return Err(ConfigError::Invalid(format!("unknown control character name {name:?}")));
            }
        }
        Ok(())
    }

    /// Bytes replaced with a space when pasting
    pub fn disallowed_paste_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        for name in &self.disallowed_paste_characters {
            if name.eq_ignore_ascii_case("C0") {
                bytes.extend(0x00..=0x1F);
            } else if let Some(byte) = lookup_control(name) {
                bytes.push(byte);
            }
        }
        bytes.sort_unstable();
        bytes.dedup();
        bytes
    }
}

fn lookup_control(name: &str) -> Option<u8> {
    CONTROL_NAMES
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, byte)| byte)
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

/// Get the default configuration file path
fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("mochi").join("vt.toml"))
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML encoding error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
