//! Terminal actions produced by the parser
//!
//! These actions represent the semantic meaning of parsed escape sequences.
//! The parser never applies them; the terminal does.

use serde::{Deserialize, Serialize};

/// Compound CSI command tag: prefix and intermediate bytes followed by the
/// final byte, packed most significant first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CsiTag(pub u32);

impl CsiTag {
    /// Build a tag from its bytes, e.g. `b"?$p"`
    pub const fn new(bytes: &[u8]) -> CsiTag {
        let mut tag = 0u32;
        let mut i = 0;
        while i < bytes.len() {
            tag = (tag << 8) | bytes[i] as u32;
            i += 1;
        }
        CsiTag(tag)
    }

    /// The final byte of the sequence
    pub fn final_byte(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Bytes of the tag, in sequence order
    pub fn bytes(self) -> Vec<u8> {
        let mut bytes: Vec<u8> = self.0.to_be_bytes().into_iter().skip_while(|&b| b == 0).collect();
        if bytes.is_empty() {
            bytes.push(0);
        }
        bytes
    }
}

/// A complete control sequence: parameters plus the command tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsiSequence {
    /// Numeric parameters; an omitted parameter is 0
    pub params: Vec<u32>,
    pub tag: CsiTag,
}

impl CsiSequence {
    /// Raw parameter, 0 when absent
    pub fn param(&self, index: usize) -> u32 {
        self.params.get(index).copied().unwrap_or(0)
    }

    /// Parameter with a default for 0 or absent values
    pub fn param_or(&self, index: usize, default: u32) -> u32 {
        match self.param(index) {
            0 => default,
            value => value,
        }
    }

    /// Repeat count: absent and 0 both mean 1
    pub fn count(&self, index: usize) -> usize {
        self.param_or(index, 1) as usize
    }
}

/// A fully parsed device control string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DcsCommand {
    /// DECUDK: program function keys
    UserDefinedKeys {
        /// Drop all existing definitions first
        clear: bool,
        /// Lock the definitions against further changes
        lock: bool,
        /// (key number, decoded bytes)
        keys: Vec<(u32, Vec<u8>)>,
    },
    /// DECRQSS: report the setting named by these bytes
    RequestSettings(Vec<u8>),
}

/// Actions produced by the parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Write a decoded character. Bytes 0x20-0x7E still need GL translation.
    Print(char),
    /// An 8-bit byte to translate through GR (national replacement mode)
    PrintGr(u8),
    /// Execute a C0 control or an 8-bit C1 control with a single-byte meaning
    Execute(u8),
    /// ESC followed by a final byte
    Esc(u8),
    /// VT52 escape
    Vt52(u8),
    /// VT52 direct cursor address (ESC Y), 0-based
    Vt52Position { line: u8, column: u8 },
    /// Designate a charset into G0-G3
    Designate { slot: u8, size96: bool, designator: u8 },
    /// ESC % final: select the byte encoding
    SelectEncoding(u8),
    /// ESC # final: line size or alignment pattern
    LineAttribute(u8),
    /// ESC SP final: C1 transmission and ANSI conformance
    ControlTransmission(u8),
    Csi(CsiSequence),
    Osc { number: u32, payload: String },
    Dcs(DcsCommand),
    Apc { number: u32, payload: String },
}

impl Action {
    pub fn is_print(&self) -> bool {
        matches!(self, Action::Print(_) | Action::PrintGr(_))
    }

    pub fn is_csi(&self) -> bool {
        matches!(self, Action::Csi(_))
    }
}
