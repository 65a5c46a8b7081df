use serde::{Deserialize, Serialize};

use crate::models::SummaryMode;

pub const DEFAULT_LANGUAGE: &str = "auto";

/// JSON body sent to every summarization endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub text: String,
    pub language: String,
    pub memory: bool,
    pub mode: SummaryMode,
}

impl SummaryRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), language: DEFAULT_LANGUAGE.to_string(), memory: false, mode: SummaryMode::default() }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_memory(mut self, memory: bool) -> Self {
        self.memory = memory;
        self
    }

    pub fn with_mode(mut self, mode: SummaryMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Fields the front end reads from a response body. Anything else is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SummaryResponse {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SummaryResponse {
    /// Lenient read of an already-parsed body; non-string fields count as absent
    pub fn from_value(value: &serde_json::Value) -> Self {
        let field = |name: &str| value.get(name).and_then(serde_json::Value::as_str).map(str::to_string);
        Self { summary: field("summary"), error: field("error") }
    }

    /// The summary when present and non-empty
    pub fn summary_text(&self) -> Option<&str> {
        self.summary.as_deref().filter(|s| !s.is_empty())
    }
}
