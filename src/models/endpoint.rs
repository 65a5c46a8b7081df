use std::fmt;
use std::str::FromStr;

use anyhow::{Error, anyhow};
use serde::{Deserialize, Serialize};

/// Backend actions that take a `{text, language, memory, mode}` body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Summarize,
    Bullets,
    Takeaways,
    ExtractLinks,
    Ask,
}

impl Endpoint {
    pub const ALL: [Endpoint; 5] =
        [Endpoint::Summarize, Endpoint::Bullets, Endpoint::Takeaways, Endpoint::ExtractLinks, Endpoint::Ask];

    /// URL path segment
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Summarize => "summarize-gemini",
            Endpoint::Bullets => "summarize-gemini-bullets",
            Endpoint::Takeaways => "summarize-gemini-takeaways",
            Endpoint::ExtractLinks => "extract-links",
            Endpoint::Ask => "ask-gemini",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Endpoint::Summarize => "Summarize",
            Endpoint::Bullets => "Bullets",
            Endpoint::Takeaways => "Takeaways",
            Endpoint::ExtractLinks => "Links",
            Endpoint::Ask => "Ask",
        }
    }

    /// Ask continues the conversation; every other action replaces the transcript
    pub fn is_conversational(self) -> bool {
        self == Endpoint::Ask
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|e| e.path().eq_ignore_ascii_case(s) || e.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow!("Unknown endpoint '{}'", s))
    }
}

/// Summary length hint sent as `mode`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMode {
    Short,
    #[default]
    Medium,
    Long,
}

impl SummaryMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SummaryMode::Short => "short",
            SummaryMode::Medium => "medium",
            SummaryMode::Long => "long",
        }
    }
}

impl fmt::Display for SummaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(SummaryMode::Short),
            "medium" => Ok(SummaryMode::Medium),
            "long" => Ok(SummaryMode::Long),
            other => Err(anyhow!("Unknown summary mode '{}' (expected short|medium|long)", other)),
        }
    }
}
