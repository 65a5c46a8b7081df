//! Best-effort local key/value storage
//!
//! Everything the client remembers between runs lives in one JSON file,
//! `<data_dir>/state.json`:
//! - `draftText`: the unsent input
//! - `summaryHistory`: JSON array of past summaries, newest first
//! - `theme`: selected colour theme
//! - `bg-theme`: selected background effect
//!
//! Write failures are logged and otherwise ignored; a missing or unreadable
//! file behaves like an empty store.

pub mod persistence;

use std::path::{Path, PathBuf};

use anyhow::Result;
pub use persistence::{STORE_VERSION, StoreFile, load_store, save_store};

use crate::history::SummaryHistory;
use crate::models::{EffectKind, Theme};

pub const DRAFT_KEY: &str = "draftText";
pub const HISTORY_KEY: &str = "summaryHistory";
pub const THEME_KEY: &str = "theme";
pub const EFFECT_KEY: &str = "bg-theme";

const STATE_FILENAME: &str = "state.json";

pub struct LocalStore {
    path: PathBuf,
    file: StoreFile,
}

impl LocalStore {
    /// Open the store in `data_dir`, starting empty if nothing readable is there
    pub fn open(data_dir: &Path) -> Self {
        let path = data_dir.join(STATE_FILENAME);
        let file = match load_store(&path) {
            Ok(Some(file)) => file,
            Ok(None) => StoreFile::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Could not read state file");
                StoreFile::default()
            }
        };
        Self { path, file }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.file.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        self.file.entries.insert(key.to_string(), value.into());
        save_store(&self.path, &self.file)
    }

    pub fn remove(&mut self, key: &str) -> Result<()> {
        if self.file.entries.remove(key).is_some() {
            save_store(&self.path, &self.file)?;
        }
        Ok(())
    }

    pub fn draft(&self) -> Option<&str> {
        self.get(DRAFT_KEY).filter(|d| !d.is_empty())
    }

    pub fn save_draft(&mut self, draft: &str) {
        log_failure("draft", self.set(DRAFT_KEY, draft));
    }

    pub fn delete_draft(&mut self) {
        log_failure("draft", self.remove(DRAFT_KEY));
    }

    pub fn history(&self) -> SummaryHistory {
        self.get(HISTORY_KEY).map(SummaryHistory::from_json).unwrap_or_default()
    }

    pub fn save_history(&mut self, history: &SummaryHistory) {
        let result = history.to_json().and_then(|json| self.set(HISTORY_KEY, json));
        log_failure("history", result);
    }

    pub fn clear_history(&mut self) {
        log_failure("history", self.remove(HISTORY_KEY));
    }

    pub fn theme(&self) -> Theme {
        self.get(THEME_KEY).and_then(|t| t.parse().ok()).unwrap_or_default()
    }

    pub fn save_theme(&mut self, theme: Theme) {
        log_failure("theme", self.set(THEME_KEY, theme.as_str()));
    }

    pub fn effect(&self) -> EffectKind {
        self.get(EFFECT_KEY).and_then(|e| e.parse().ok()).unwrap_or_default()
    }

    pub fn save_effect(&mut self, effect: EffectKind) {
        log_failure("bg-theme", self.set(EFFECT_KEY, effect.as_str()));
    }
}

fn log_failure(what: &str, result: Result<()>) {
    if let Err(e) = result {
        tracing::warn!(key = what, error = %e, "Failed to persist local state");
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_empty_store_defaults() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::open(dir.path());

        assert_eq!(store.draft(), None);
        assert!(store.history().is_empty());
        assert_eq!(store.theme(), Theme::Dark);
        assert_eq!(store.effect(), EffectKind::None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = LocalStore::open(dir.path());
            store.save_draft("half-written text");
            store.save_theme(Theme::Pastel);
            store.save_effect(EffectKind::Stars);
            let mut history = SummaryHistory::new();
            history.push("a summary");
            store.save_history(&history);
        }

        let store = LocalStore::open(dir.path());
        assert_eq!(store.draft(), Some("half-written text"));
        assert_eq!(store.theme(), Theme::Pastel);
        assert_eq!(store.effect(), EffectKind::Stars);
        assert_eq!(store.history().entries(), &["a summary".to_string()]);
    }

    #[test]
    fn test_history_stored_as_json_array() {
        let dir = TempDir::new().unwrap();
        let mut store = LocalStore::open(dir.path());
        let mut history = SummaryHistory::new();
        history.push("one");
        history.push("two");
        store.save_history(&history);

        assert_eq!(store.get(HISTORY_KEY), Some(r#"["two","one"]"#));
    }

    #[test]
    fn test_delete_draft_and_clear_history() {
        let dir = TempDir::new().unwrap();
        let mut store = LocalStore::open(dir.path());
        store.save_draft("draft");
        let mut history = SummaryHistory::new();
        history.push("x");
        store.save_history(&history);

        store.delete_draft();
        store.clear_history();

        let reopened = LocalStore::open(dir.path());
        assert_eq!(reopened.draft(), None);
        assert!(reopened.history().is_empty());
    }

    #[test]
    fn test_unknown_values_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let mut store = LocalStore::open(dir.path());
        store.set(THEME_KEY, "neon").unwrap();
        store.set(EFFECT_KEY, "fireworks").unwrap();

        assert_eq!(store.theme(), Theme::Dark);
        assert_eq!(store.effect(), EffectKind::None);
    }
}
