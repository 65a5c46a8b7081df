//! Configuration loaded from TOML, with command-line overrides on top.
//!
//! Every field has a default, so a missing file or a partial one is fine:
//!
//! ```toml
//! [backend]
//! base_url = "http://127.0.0.1:5000"
//! language = "auto"
//! memory = false
//! mode = "medium"
//!
//! [ui]
//! frame_interval_ms = 33
//!
//! [speech]
//! tts_command = "espeak-ng"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::gateway::{DEFAULT_BASE_URL, DEFAULT_LANGUAGE};
use crate::models::SummaryMode;
use crate::speech::DEFAULT_TTS_COMMAND;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub language: String,
    pub memory: bool,
    pub mode: SummaryMode,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            memory: false,
            mode: SummaryMode::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub frame_interval_ms: u64,
    /// Per-character delay when revealing a fresh reply
    pub reveal_delay_ms: u64,
    /// Per-character delay for history replays and rephrases
    pub replay_delay_ms: u64,
    pub keyword_limit: usize,
    pub replay_keyword_limit: usize,
    /// Where exports land; the working directory when unset
    pub export_dir: Option<PathBuf>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 33,
            reveal_delay_ms: 14,
            replay_delay_ms: 12,
            keyword_limit: 16,
            replay_keyword_limit: 12,
            export_dir: None,
        }
    }
}

impl UiConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub tts_command: String,
    pub voice: Option<String>,
    /// Command whose stdout is the recognized text
    pub stt_command: Option<String>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self { tts_command: DEFAULT_TTS_COMMAND.to_string(), voice: None, stt_command: None }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub ui: UiConfig,
    pub speech: SpeechConfig,
    pub storage: StorageConfig,
}

/// Values given on the command line; `None` leaves the file value alone
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub language: Option<String>,
    pub mode: Option<SummaryMode>,
    pub memory: Option<bool>,
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Explicit path if given, else the default location when it exists, else defaults
    pub fn load(explicit: Option<&Path>, default_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_path {
            Some(path) if path.is_file() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(base_url) = overrides.base_url {
            self.backend.base_url = base_url;
        }
        if let Some(language) = overrides.language {
            self.backend.language = language;
        }
        if let Some(mode) = overrides.mode {
            self.backend.mode = mode;
        }
        if let Some(memory) = overrides.memory {
            self.backend.memory = memory;
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
