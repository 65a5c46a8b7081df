//! Bounded, newest-first summary history.
//!
//! Persisted as a JSON array of strings under the `summaryHistory` key; see
//! [`crate::storage::LocalStore`].

use anyhow::{Context, Result};
use nucleo::pattern::{CaseMatching, Normalization, Pattern};
use nucleo::{Config, Matcher, Utf32Str};

/// Maximum number of summaries kept
pub const MAX_HISTORY_ENTRIES: usize = 40;

/// Characters of an entry shown in the history panel
const LABEL_CHARS: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryHistory {
    entries: Vec<String>,
}

impl SummaryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the stored JSON array. Anything unreadable yields an empty history.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Vec<String>>(json) {
            Ok(mut entries) => {
                entries.truncate(MAX_HISTORY_ENTRIES);
                Self { entries }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable summary history");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.entries).context("Failed to serialize summary history")
    }

    /// Insert at the front, evicting the oldest entries beyond the bound
    pub fn push(&mut self, summary: impl Into<String>) {
        self.entries.insert(0, summary.into());
        self.entries.truncate(MAX_HISTORY_ENTRIES);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.entries.get(idx).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Indices of entries whose panel label fuzzy-matches `query`, newest first
    pub fn search(&self, query: &str) -> Vec<usize> {
        let query = query.trim();
        if query.is_empty() {
            return (0..self.entries.len()).collect();
        }

        let pattern = Pattern::parse(query, CaseMatching::Ignore, Normalization::Smart);
        let mut matcher = Matcher::new(Config::DEFAULT);
        let mut buf = Vec::new();

        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| {
                let label = history_label(entry);
                pattern.score(Utf32Str::new(&label, &mut buf), &mut matcher).is_some()
            })
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// Panel label: the first 100 characters, with `...` when cut
pub fn history_label(entry: &str) -> String {
    let mut chars = entry.chars();
    let head: String = chars.by_ref().take(LABEL_CHARS).collect();
    if chars.next().is_some() { format!("{}...", head) } else { head }
}
