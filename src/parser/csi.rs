//! CSI command tables
//!
//! Control sequences are looked up by their compound tag in one of two
//! tables. The baseline table covers the VT100 class; the extended table
//! adds the VT220-VT420 repertoire and is consulted first once the
//! conformance level is 2 or higher, falling back to the baseline.

use std::collections::HashMap;

use super::actions::CsiTag;

/// Known control sequence functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CsiCommand {
    // Cursor motion
    Cuu,
    Cud,
    Cuf,
    Cub,
    Cnl,
    Cpl,
    Cha,
    Cup,
    Hvp,
    Hpa,
    Hpr,
    Vpa,
    Vpr,
    Cht,
    Cbt,
    Tbc,

    // Editing
    Ed,
    El,
    Il,
    Dl,
    Dch,
    Ich,
    Ech,
    Su,
    Sd,
    Sl,
    Sr,
    Rep,
    Decic,
    Decdc,

    // Modes
    Sm,
    Rm,
    DecSet,
    DecReset,
    SaveModes,
    RestoreModes,

    // Rendition
    Sgr,
    XtermKeyModifiers,

    // Margins and cursor save
    Decstbm,
    Decslrm,
    Scosc,
    Scorc,

    // Reports
    Da1,
    Da2,
    Da3,
    Dsr,
    DsrDec,
    Decreqtparm,
    Decrqm,
    DecrqmDec,
    Decrqde,
    Decrqpsr,
    Decrqupss,

    // Terminal setup
    Decscl,
    Decstr,
    Decscusr,
    Deccolm,
    Decsnls,
    Window,
    Decsca,
    Decsed,
    Decsel,
    Decssdt,
    Decsasd,

    // Rectangles
    Decfra,
    Decera,
    Decsera,
    Deccra,
    Deccara,
    Decrara,
    Decsace,
}

use CsiCommand::*;

const BASELINE: &[(&[u8], CsiCommand)] = &[
    (b"A", Cuu),
    (b"B", Cud),
    (b"C", Cuf),
    (b"D", Cub),
    (b"E", Cnl),
    (b"F", Cpl),
    (b"G", Cha),
    (b"H", Cup),
    (b"f", Hvp),
    (b"`", Hpa),
    (b"a", Hpr),
    (b"d", Vpa),
    (b"e", Vpr),
    (b"I", Cht),
    (b"Z", Cbt),
    (b"g", Tbc),
    (b"J", Ed),
    (b"K", El),
    (b"L", Il),
    (b"M", Dl),
    (b"P", Dch),
    (b"S", Su),
    (b"T", Sd),
    (b" @", Sl),
    (b" A", Sr),
    (b"b", Rep),
    (b"h", Sm),
    (b"l", Rm),
    (b"?h", DecSet),
    (b"?l", DecReset),
    (b"?s", SaveModes),
    (b"?r", RestoreModes),
    (b"m", Sgr),
    (b">m", XtermKeyModifiers),
    (b">n", XtermKeyModifiers),
    (b"r", Decstbm),
    (b"s", Scosc),
    (b"u", Scorc),
    (b"c", Da1),
    (b">c", Da2),
    (b"=c", Da3),
    (b"n", Dsr),
    (b"?n", DsrDec),
    (b"x", Decreqtparm),
    (b"\"p", Decscl),
    (b"$|", Deccolm),
];

const EXTENDED: &[(&[u8], CsiCommand)] = &[
    (b"@", Ich),
    (b"X", Ech),
    (b"'}", Decic),
    (b"'~", Decdc),
    (b"s", Decslrm),
    (b"$p", Decrqm),
    (b"?$p", DecrqmDec),
    (b"\"v", Decrqde),
    (b"$w", Decrqpsr),
    (b"&u", Decrqupss),
    (b"!p", Decstr),
    (b" q", Decscusr),
    (b"*|", Decsnls),
    (b"t", Window),
    (b"\"q", Decsca),
    (b"?J", Decsed),
    (b"?K", Decsel),
    (b"$~", Decssdt),
    (b"$}", Decsasd),
    (b"$x", Decfra),
    (b"$z", Decera),
    (b"${", Decsera),
    (b"$v", Deccra),
    (b"$r", Deccara),
    (b"$t", Decrara),
    (b"*x", Decsace),
];

fn build(entries: &[(&[u8], CsiCommand)]) -> HashMap<CsiTag, CsiCommand> {
    entries.iter().map(|&(bytes, cmd)| (CsiTag::new(bytes), cmd)).collect()
}

/// The two dispatch maps
#[derive(Debug, Clone)]
pub struct CommandTable {
    baseline: HashMap<CsiTag, CsiCommand>,
    extended: HashMap<CsiTag, CsiCommand>,
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandTable {
    pub fn new() -> Self {
        Self {
            baseline: build(BASELINE),
            extended: build(EXTENDED),
        }
    }

    /// Resolve a tag for the given conformance level
    pub fn lookup(&self, tag: CsiTag, level: u8) -> Option<CsiCommand> {
        if level >= 2 {
            if let Some(&cmd) = self.extended.get(&tag) {
                return Some(cmd);
            }
        }
        self.baseline.get(&tag).copied()
    }
}
