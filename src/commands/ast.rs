use std::path::PathBuf;

use crate::models::{EffectKind, SummaryMode, Theme};

/// An input line starting with `/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Import a `.txt` or `.pdf` file into the input box
    Open(PathBuf),
    /// Request language, `auto` to let the backend decide
    Language(String),
    Mode(SummaryMode),
    /// `None` toggles
    Memory(Option<bool>),
    Theme(Theme),
    Effect(EffectKind),
    /// `None` goes back to the language-derived voice
    Voice(Option<String>),
    ClearHistory,
    Help,
}

impl Command {
    pub const USAGE: &'static str = "/open <file> · /lang <code> · /mode short|medium|long · /memory [on|off] · \
                                      /theme <name> · /effect <name> · /voice <name|default> · /clear-history";
}
