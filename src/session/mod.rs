//! Chat session: everything the front end does between a key press and the
//! screen, without the screen.
//!
//! The session turns user intents into backend [`Job`]s and applies the
//! [`Outcome`]s that come back. Starting any job returns it to the caller to
//! submit, so the whole flow runs (and is tested) without a network or a
//! terminal.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::chat::{Revealer, Transcript};
use crate::clipboard::{ClipboardProvider, copy_with_provider};
use crate::config::AppConfig;
use crate::export::{ExportFormat, export_summary};
use crate::gateway::{DEFAULT_LANGUAGE, GatewayError, Job, Outcome, SummaryRequest};
use crate::history::SummaryHistory;
use crate::import::import_file;
use crate::keywords::extract_top_keywords;
use crate::models::{Endpoint, Sender, SummaryMode};
use crate::speech::VOICE_ERROR_MESSAGE;
use crate::storage::LocalStore;
use crate::utils::strip_ansi_codes;
use crate::wordcloud::WordCloud;

pub const EMPTY_INPUT_WARNING: &str = "⚠️ Please enter some text first.";
pub const NO_RESULT_MESSAGE: &str = "❌ Could not retrieve a result.";
pub const MEMORY_CLEARED_MESSAGE: &str = "🗑️ Memory cleared. Start a new conversation.";
pub const MEMORY_CLEAR_FAILED_MESSAGE: &str = "❌ Error clearing memory.";
pub const REPHRASE_FAILED_MESSAGE: &str = "❌ Rephrase failed.";
pub const DRAFT_DELETED_MESSAGE: &str = "🗑️ Draft deleted.";
pub const COPIED_MESSAGE: &str = "✅ Summary copied to clipboard!";

/// Request parameters and pacing
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub language: String,
    pub memory: bool,
    pub mode: SummaryMode,
    pub reveal_delay: Duration,
    pub replay_delay: Duration,
    pub keyword_limit: usize,
    pub replay_keyword_limit: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl SessionOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            language: config.backend.language.clone(),
            memory: config.backend.memory,
            mode: config.backend.mode,
            reveal_delay: Duration::from_millis(config.ui.reveal_delay_ms),
            replay_delay: Duration::from_millis(config.ui.replay_delay_ms),
            keyword_limit: config.ui.keyword_limit,
            replay_keyword_limit: config.ui.replay_keyword_limit,
        }
    }
}

pub struct Session {
    transcript: Transcript,
    revealer: Revealer,
    history: SummaryHistory,
    word_cloud: WordCloud,
    input: String,
    last_submitted: Option<String>,
    options: SessionOptions,
    store: Option<LocalStore>,
    started: Instant,
    pending: bool,
    exports_enabled: bool,
    celebrate: bool,
    alert: Option<String>,
}

impl Session {
    /// Start a session, restoring the draft and history from `store`
    pub fn new(options: SessionOptions, store: Option<LocalStore>) -> Self {
        Self::with_parts(options, store, Revealer::new(), WordCloud::new())
    }

    /// Deterministic reveal jitter and word placement
    pub fn with_seed(options: SessionOptions, store: Option<LocalStore>, seed: u64) -> Self {
        Self::with_parts(options, store, Revealer::with_seed(seed), WordCloud::with_seed(seed))
    }

    fn with_parts(options: SessionOptions, store: Option<LocalStore>, revealer: Revealer, word_cloud: WordCloud) -> Self {
        let history = store.as_ref().map(LocalStore::history).unwrap_or_default();
        let input = store.as_ref().and_then(LocalStore::draft).unwrap_or_default().to_string();
        Self {
            transcript: Transcript::new(),
            revealer,
            history,
            word_cloud,
            input,
            last_submitted: None,
            options,
            store,
            started: Instant::now(),
            pending: false,
            exports_enabled: false,
            celebrate: false,
            alert: None,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn history(&self) -> &SummaryHistory {
        &self.history
    }

    pub fn word_cloud(&self) -> &WordCloud {
        &self.word_cloud
    }

    pub fn word_cloud_mut(&mut self) -> &mut WordCloud {
        &mut self.word_cloud
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn store(&self) -> Option<&LocalStore> {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> Option<&mut LocalStore> {
        self.store.as_mut()
    }

    /// A request is in flight (the loader is showing)
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Copy, export and speech controls are usable
    pub fn exports_enabled(&self) -> bool {
        self.exports_enabled && !self.pending
    }

    pub fn is_revealing(&self) -> bool {
        self.revealer.is_active()
    }

    // ----- input box -----

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the input text and auto-save it as the draft
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.save_draft();
    }

    pub fn push_char(&mut self, ch: char) {
        self.input.push(ch);
        self.save_draft();
    }

    pub fn push_str(&mut self, text: &str) {
        self.input.push_str(text);
        self.save_draft();
    }

    pub fn pop_char(&mut self) -> bool {
        let popped = self.input.pop().is_some();
        if popped {
            self.save_draft();
        }
        popped
    }

    fn save_draft(&mut self) {
        if let Some(store) = &mut self.store {
            store.save_draft(&self.input);
        }
    }

    /// Forget the draft, both in the box and on disk
    pub fn delete_draft(&mut self) {
        self.input.clear();
        if let Some(store) = &mut self.store {
            store.delete_draft();
        }
        self.transcript.add_message(Sender::Bot, DRAFT_DELETED_MESSAGE);
    }

    // ----- request parameters -----

    pub fn set_language(&mut self, language: impl Into<String>) {
        let language = language.into();
        self.options.language = if language.trim().is_empty() { DEFAULT_LANGUAGE.to_string() } else { language };
    }

    pub fn set_mode(&mut self, mode: SummaryMode) {
        self.options.mode = mode;
    }

    /// Set the memory switch, or flip it when `None`. Returns the new value.
    pub fn set_memory(&mut self, memory: Option<bool>) -> bool {
        self.options.memory = memory.unwrap_or(!self.options.memory);
        self.options.memory
    }

    fn request(&self, text: String) -> SummaryRequest {
        SummaryRequest::new(text)
            .with_language(self.options.language.clone())
            .with_memory(self.options.memory)
            .with_mode(self.options.mode)
    }

    // ----- starting backend work -----

    /// Flush any running reveal so nothing outlives the next action
    pub fn finish_reveal(&mut self) {
        self.revealer.finish(&mut self.transcript);
    }

    /// Submit the input to `endpoint`.
    ///
    /// Blank input adds a warning and returns `None`. Otherwise the loader and
    /// typing indicator come up, export controls are disabled, and for the
    /// conversational endpoint the text is echoed as a user message.
    pub fn begin(&mut self, endpoint: Endpoint) -> Option<Job> {
        self.finish_reveal();
        let text = self.input.trim().to_string();
        if text.is_empty() {
            self.transcript.add_message(Sender::Bot, EMPTY_INPUT_WARNING);
            return None;
        }

        self.pending = true;
        self.exports_enabled = false;
        self.last_submitted = Some(text.clone());
        if endpoint.is_conversational() {
            self.transcript.add_message(Sender::User, &text);
        }
        self.transcript.show_typing();
        Some(Job::Summarize { endpoint, request: self.request(text) })
    }

    /// Re-summarize focusing on `word`.
    ///
    /// The input gets a `Focus:` line appended (restoring the last submitted
    /// text first when the box is empty) and Summarize is triggered.
    pub fn focus_on(&mut self, word: &str) -> Option<Job> {
        if self.input.trim().is_empty()
            && let Some(last) = &self.last_submitted
        {
            self.input = last.clone();
        }
        self.push_str(&format!("\n\nFocus: {word}"));
        self.begin(Endpoint::Summarize)
    }

    /// A click on the word cloud panel, relative to its top-left cell
    pub fn click_word_cloud(&mut self, column: u16, row: u16) -> Option<Job> {
        let word = self.word_cloud.click_cell(column, row)?;
        tracing::info!(word = %word, "Focusing on keyword");
        self.focus_on(&word)
    }

    /// Re-summarize the visible transcript. `None` when there is nothing to rephrase.
    pub fn begin_rephrase(&mut self) -> Option<Job> {
        self.finish_reveal();
        let text = self.transcript.plain_text();
        if text.is_empty() {
            return None;
        }
        self.pending = true;
        self.transcript.show_typing();
        Some(Job::Rephrase { request: SummaryRequest::new(text).with_language(self.options.language.clone()) })
    }

    pub fn begin_clear_memory(&mut self) -> Job {
        self.finish_reveal();
        self.pending = true;
        self.transcript.show_typing();
        Job::ClearMemory
    }

    /// The job was dropped before it could complete
    pub fn abandon(&mut self) {
        self.pending = false;
        self.transcript.hide_typing();
    }

    // ----- applying outcomes -----

    /// Apply the result of the latest job
    pub fn complete(&mut self, outcome: Outcome, now: Instant) {
        self.pending = false;
        self.transcript.hide_typing();

        match outcome {
            Outcome::Summary { endpoint, result } => {
                match result {
                    Ok(summary) => {
                        let keep_transcript = endpoint.is_conversational();
                        let (delay, limit) = (self.options.reveal_delay, self.options.keyword_limit);
                        self.present_summary(&summary, keep_transcript, delay, limit, now);
                        self.exports_enabled = true;
                    }
                    Err(GatewayError::NoResult { detail }) => {
                        let message = format!("{NO_RESULT_MESSAGE} {detail}");
                        self.transcript.add_message(Sender::Bot, message.trim_end());
                    }
                    Err(e) => {
                        tracing::warn!(endpoint = %endpoint, error = %e, "Request failed");
                        self.transcript.add_message(Sender::Bot, &format!("❌ Error: {e}"));
                    }
                }
                self.input.clear();
                self.save_draft();
            }
            Outcome::Rephrase { result } => match result {
                Ok(summary) => {
                    let (delay, limit) = (self.options.replay_delay, self.options.keyword_limit);
                    self.present_summary(&summary, false, delay, limit, now);
                    self.exports_enabled = true;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Rephrase failed");
                    self.transcript.add_message(Sender::Bot, REPHRASE_FAILED_MESSAGE);
                }
            },
            Outcome::MemoryCleared { result } => match result {
                Ok(()) => {
                    self.transcript.clear();
                    self.transcript.add_message(Sender::Bot, MEMORY_CLEARED_MESSAGE);
                    self.input.clear();
                    self.save_draft();
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Clearing memory failed");
                    self.transcript.add_message(Sender::Bot, MEMORY_CLEAR_FAILED_MESSAGE);
                }
            },
        }
    }

    /// Reveal `summary` in a fresh bot message, record it and rebuild the cloud
    fn present_summary(&mut self, summary: &str, keep_transcript: bool, delay: Duration, limit: usize, now: Instant) {
        let summary = strip_ansi_codes(summary);
        if !keep_transcript {
            self.transcript.clear();
        }
        let id = self.transcript.add_message(Sender::Bot, "");
        self.revealer.start(&mut self.transcript, id, &summary, delay, now);

        self.history.push(summary.clone());
        if let Some(store) = &mut self.store {
            store.save_history(&self.history);
        }
        self.word_cloud.build(&extract_top_keywords(&summary, limit));
    }

    // ----- history -----

    /// Show history entry `index` again. False if there is no such entry.
    pub fn replay_history(&mut self, index: usize, now: Instant) -> bool {
        let Some(entry) = self.history.get(index).map(str::to_string) else {
            return false;
        };
        self.finish_reveal();
        self.transcript.clear();
        let id = self.transcript.add_message(Sender::Bot, "");
        self.revealer.start(&mut self.transcript, id, &entry, self.options.replay_delay, now);
        self.word_cloud.build(&extract_top_keywords(&entry, self.options.replay_keyword_limit));
        self.exports_enabled = true;
        true
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        if let Some(store) = &mut self.store {
            store.clear_history();
        }
    }

    // ----- copy, export, speech, import -----

    /// Transcript text for copy, export and speech; `None` when empty
    pub fn summary_text(&self) -> Option<String> {
        let text = self.transcript.plain_text();
        (!text.is_empty()).then_some(text)
    }

    /// Copy the transcript. `Ok(false)` when there is nothing to copy.
    pub fn copy_summary(&mut self, provider: &mut dyn ClipboardProvider) -> Result<bool> {
        self.finish_reveal();
        let Some(text) = self.summary_text() else {
            return Ok(false);
        };
        copy_with_provider(&text, provider)?;
        self.transcript.add_message(Sender::Bot, COPIED_MESSAGE);
        self.celebrate = true;
        Ok(true)
    }

    /// Write the transcript into `dir`. `Ok(None)` when there is nothing to write.
    pub fn export(&mut self, format: ExportFormat, dir: &Path) -> Result<Option<PathBuf>> {
        self.finish_reveal();
        let Some(text) = self.summary_text() else {
            return Ok(None);
        };
        let path = export_summary(&text, format, dir)?;
        self.celebrate = true;
        Ok(Some(path))
    }

    /// Request a confetti burst on the next frame
    pub fn celebrate(&mut self) {
        self.celebrate = true;
    }

    pub fn take_celebration(&mut self) -> bool {
        std::mem::take(&mut self.celebrate)
    }

    /// Apply a speech recognition result
    pub fn voice_input(&mut self, result: Result<String>) {
        match result {
            Ok(text) => self.set_input(text),
            Err(e) => {
                tracing::warn!(error = %e, "Speech recognition failed");
                self.transcript.add_message(Sender::Bot, VOICE_ERROR_MESSAGE);
            }
        }
    }

    pub fn speech_failed(&mut self, error: &anyhow::Error) {
        tracing::warn!(error = %error, "Speech synthesis failed");
        self.transcript.add_message(Sender::Bot, &format!("❌ Speech synthesis error: {error}"));
    }

    /// Load a file into the input box; failures raise a blocking alert
    pub fn import_path(&mut self, path: &Path) -> bool {
        match import_file(path) {
            Ok(text) => {
                self.set_input(strip_ansi_codes(&text));
                true
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Import failed");
                self.alert = Some(e.to_string());
                false
            }
        }
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Post an informational bot message
    pub fn notify(&mut self, text: &str) {
        self.transcript.add_message(Sender::Bot, text);
    }

    // ----- frame -----

    /// Advance the reveal and the word cloud. Returns true if the transcript changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.word_cloud.step(now.saturating_duration_since(self.started).as_secs_f64());
        self.revealer.tick(&mut self.transcript, now)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::import::UNSUPPORTED_MESSAGE;
    use crate::models::ChatMessage;

    fn session() -> Session {
        Session::with_seed(SessionOptions::default(), None, 7)
    }

    fn texts(session: &Session) -> Vec<String> {
        session.transcript().messages().iter().map(|m| crate::chat::markup::decode(&m.content)).collect()
    }

    fn bots(session: &Session) -> Vec<&ChatMessage> {
        session.transcript().messages().iter().filter(|m| !m.is_user()).collect()
    }

    fn summary_ok(endpoint: Endpoint, text: &str) -> Outcome {
        Outcome::Summary { endpoint, result: Ok(text.to_string()) }
    }

    #[test]
    fn test_blank_input_warns_without_job() {
        let mut s = session();
        s.set_input("   \n\t ");

        assert!(s.begin(Endpoint::Summarize).is_none());
        assert_eq!(texts(&s), vec![EMPTY_INPUT_WARNING]);
        assert!(!s.is_pending());
    }

    #[test]
    fn test_begin_builds_request_from_options() {
        let mut s = session();
        s.set_language("de");
        s.set_mode(SummaryMode::Long);
        s.set_memory(Some(true));
        s.set_input("  Some article  ");

        let job = s.begin(Endpoint::Bullets).unwrap();
        let expected = SummaryRequest::new("Some article")
            .with_language("de")
            .with_memory(true)
            .with_mode(SummaryMode::Long);
        assert_eq!(job, Job::Summarize { endpoint: Endpoint::Bullets, request: expected });
        assert!(s.is_pending());
        assert!(s.transcript().is_typing());
        assert!(!s.exports_enabled());
    }

    #[test]
    fn test_ask_echoes_user_message() {
        let mut s = session();
        s.set_input("What is Rust?");
        s.begin(Endpoint::Ask).unwrap();

        let messages = s.transcript().messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].is_user());
        assert!(messages[1].typing);
    }

    #[test]
    fn test_successful_summary_scenario() {
        let mut s = session();
        let now = Instant::now();
        s.set_input("Long article text");
        s.begin(Endpoint::Summarize).unwrap();

        s.complete(summary_ok(Endpoint::Summarize, "Hello world"), now);
        s.tick(now + Duration::from_secs(5));

        assert_eq!(bots(&s).len(), 1);
        assert_eq!(texts(&s), vec!["Hello world"]);
        assert_eq!(s.history().entries(), ["Hello world"]);
        let words: Vec<&str> = s.word_cloud().entries().iter().map(|e| e.word.as_str()).collect();
        assert_eq!(words, vec!["hello", "world"]);
        assert!(!s.transcript().is_typing());
        assert!(s.exports_enabled());
        assert_eq!(s.input(), "");
    }

    #[test]
    fn test_summary_replaces_transcript_but_ask_appends() {
        let mut s = session();
        let now = Instant::now();

        s.set_input("question");
        s.begin(Endpoint::Ask).unwrap();
        s.complete(summary_ok(Endpoint::Ask, "answer"), now);
        s.finish_reveal();
        assert_eq!(texts(&s), vec!["question", "answer"]);

        s.set_input("follow up");
        s.begin(Endpoint::Ask).unwrap();
        s.complete(summary_ok(Endpoint::Ask, "second"), now);
        s.finish_reveal();
        assert_eq!(texts(&s), vec!["question", "answer", "follow up", "second"]);

        s.set_input("article");
        s.begin(Endpoint::Takeaways).unwrap();
        s.complete(summary_ok(Endpoint::Takeaways, "takeaways"), now);
        s.finish_reveal();
        assert_eq!(texts(&s), vec!["takeaways"]);
    }

    #[test]
    fn test_network_failure_scenario() {
        let mut s = session();
        s.set_input("text");
        s.begin(Endpoint::Summarize).unwrap();

        let failure = Outcome::Summary {
            endpoint: Endpoint::Summarize,
            result: Err(GatewayError::Network("connection refused".into())),
        };
        s.complete(failure, Instant::now());

        assert_eq!(texts(&s), vec!["❌ Error: network error: connection refused"]);
        assert!(s.history().is_empty());
        assert!(!s.is_pending());
        assert!(!s.exports_enabled());
        assert_eq!(s.input(), "");
    }

    #[test]
    fn test_api_error_uses_backend_message() {
        let mut s = session();
        s.set_input("text");
        s.begin(Endpoint::Summarize).unwrap();
        let failure = Outcome::Summary {
            endpoint: Endpoint::Summarize,
            result: Err(GatewayError::Api { status: 429, message: "quota exceeded".into() }),
        };
        s.complete(failure, Instant::now());

        assert_eq!(texts(&s), vec!["❌ Error: quota exceeded"]);
    }

    #[test]
    fn test_missing_summary_message() {
        let mut s = session();
        s.set_input("text");
        s.begin(Endpoint::ExtractLinks).unwrap();
        s.complete(
            Outcome::Summary {
                endpoint: Endpoint::ExtractLinks,
                result: Err(GatewayError::NoResult { detail: "no links found".into() }),
            },
            Instant::now(),
        );
        assert_eq!(texts(&s), vec!["❌ Could not retrieve a result. no links found"]);

        s.set_input("text");
        s.begin(Endpoint::ExtractLinks).unwrap();
        s.complete(
            Outcome::Summary {
                endpoint: Endpoint::ExtractLinks,
                result: Err(GatewayError::NoResult { detail: String::new() }),
            },
            Instant::now(),
        );
        assert_eq!(texts(&s).last().unwrap(), NO_RESULT_MESSAGE);
    }

    #[test]
    fn test_new_action_finishes_running_reveal() {
        let mut s = session();
        let now = Instant::now();
        s.set_input("first");
        s.begin(Endpoint::Summarize).unwrap();
        s.complete(summary_ok(Endpoint::Summarize, "a fairly long reply"), now);
        assert!(s.is_revealing());

        s.set_input("next");
        s.begin(Endpoint::Ask).unwrap();

        assert!(!s.is_revealing());
        assert_eq!(texts(&s)[0], "a fairly long reply");
    }

    #[test]
    fn test_focus_click_restores_last_text() {
        let mut s = session();
        let now = Instant::now();
        s.set_input("Rust ownership explained");
        s.begin(Endpoint::Summarize).unwrap();
        s.complete(summary_ok(Endpoint::Summarize, "ownership borrowing ownership"), now);

        let job = s.focus_on("ownership").unwrap();
        let Job::Summarize { endpoint, request } = job else {
            panic!("expected a summarize job");
        };
        assert_eq!(endpoint, Endpoint::Summarize);
        assert_eq!(request.text, "Rust ownership explained\n\nFocus: ownership");
    }

    #[test]
    fn test_word_cloud_click_triggers_focus() {
        let mut s = session();
        let now = Instant::now();
        s.word_cloud_mut().set_area(100, 16);
        s.set_input("article");
        s.begin(Endpoint::Summarize).unwrap();
        s.complete(summary_ok(Endpoint::Summarize, "borrowing"), now);

        let entry = s.word_cloud().entries()[0].clone();
        let column = (entry.x / crate::wordcloud::UNITS_PER_COLUMN) as u16;
        let row = (entry.y / crate::wordcloud::UNITS_PER_ROW) as u16;

        let job = s.click_word_cloud(column, row).unwrap();
        assert!(matches!(job, Job::Summarize { endpoint: Endpoint::Summarize, .. }));
        assert!(s.input().ends_with("Focus: borrowing"));
    }

    #[test]
    fn test_rephrase_flow() {
        let mut s = session();
        let now = Instant::now();
        assert!(s.begin_rephrase().is_none());

        s.set_input("x");
        s.begin(Endpoint::Summarize).unwrap();
        s.complete(summary_ok(Endpoint::Summarize, "original"), now);

        let Some(Job::Rephrase { request }) = s.begin_rephrase() else {
            panic!("expected a rephrase job");
        };
        assert_eq!(request.text, "original");
        assert!(s.transcript().is_typing());

        s.complete(Outcome::Rephrase { result: Ok("reworded".into()) }, now);
        assert!(!s.transcript().is_typing());
        s.finish_reveal();
        assert_eq!(texts(&s), vec!["reworded"]);
        assert_eq!(s.history().entries(), ["reworded", "original"]);

        s.begin_rephrase().unwrap();
        s.complete(Outcome::Rephrase { result: Err(GatewayError::Network("down".into())) }, now);
        assert_eq!(texts(&s), vec!["reworded", REPHRASE_FAILED_MESSAGE]);
    }

    #[test]
    fn test_clear_memory_outcomes() {
        let mut s = session();
        s.notify("old");

        assert_eq!(s.begin_clear_memory(), Job::ClearMemory);
        assert!(s.transcript().is_typing());
        s.complete(Outcome::MemoryCleared { result: Ok(()) }, Instant::now());
        assert!(!s.transcript().is_typing());
        assert_eq!(texts(&s), vec![MEMORY_CLEARED_MESSAGE]);

        s.begin_clear_memory();
        assert!(s.transcript().is_typing());
        s.complete(
            Outcome::MemoryCleared { result: Err(GatewayError::Network("down".into())) },
            Instant::now(),
        );
        assert_eq!(texts(&s), vec![MEMORY_CLEARED_MESSAGE, MEMORY_CLEAR_FAILED_MESSAGE]);
    }

    #[test]
    fn test_replay_history() {
        let mut s = session();
        let now = Instant::now();
        for text in ["first summary", "second summary"] {
            s.set_input("x");
            s.begin(Endpoint::Summarize).unwrap();
            s.complete(summary_ok(Endpoint::Summarize, text), now);
        }

        assert!(s.replay_history(1, now));
        s.tick(now + Duration::from_secs(5));
        assert_eq!(texts(&s), vec!["first summary"]);
        assert_eq!(s.history().len(), 2, "replay does not add history");
        assert!(!s.replay_history(9, now));
    }

    #[test]
    fn test_copy_summary() {
        struct Recorder(Option<String>);
        impl ClipboardProvider for Recorder {
            fn set_text(&mut self, text: &str) -> Result<()> {
                self.0 = Some(text.to_string());
                Ok(())
            }
        }

        let mut s = session();
        let mut clipboard = Recorder(None);
        assert!(!s.copy_summary(&mut clipboard).unwrap());

        s.notify("Hello <world>");
        assert!(s.copy_summary(&mut clipboard).unwrap());
        assert_eq!(clipboard.0.as_deref(), Some("Hello <world>"));
        assert_eq!(texts(&s).last().unwrap(), COPIED_MESSAGE);
        assert!(s.take_celebration());
        assert!(!s.take_celebration());
    }

    #[test]
    fn test_export_writes_transcript() {
        let dir = TempDir::new().unwrap();
        let mut s = session();
        assert_eq!(s.export(ExportFormat::Text, dir.path()).unwrap(), None);

        s.notify("line one\nline two");
        let path = s.export(ExportFormat::Document, dir.path()).unwrap().unwrap();
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.ends_with("line one\nline two"));
        assert!(s.take_celebration());
    }

    #[test]
    fn test_draft_persisted_and_restored() {
        let dir = TempDir::new().unwrap();
        {
            let mut s = Session::new(SessionOptions::default(), Some(LocalStore::open(dir.path())));
            s.set_input("half-written");
            s.push_char('!');
        }
        let mut s = Session::new(SessionOptions::default(), Some(LocalStore::open(dir.path())));
        assert_eq!(s.input(), "half-written!");

        s.delete_draft();
        assert_eq!(s.input(), "");
        assert_eq!(texts(&s), vec![DRAFT_DELETED_MESSAGE]);
        assert_eq!(LocalStore::open(dir.path()).draft(), None);
    }

    #[test]
    fn test_history_persisted() {
        let dir = TempDir::new().unwrap();
        let mut s = Session::new(SessionOptions::default(), Some(LocalStore::open(dir.path())));
        s.set_input("x");
        s.begin(Endpoint::Summarize).unwrap();
        s.complete(summary_ok(Endpoint::Summarize, "kept"), Instant::now());

        let reopened = Session::new(SessionOptions::default(), Some(LocalStore::open(dir.path())));
        assert_eq!(reopened.history().entries(), ["kept"]);

        s.clear_history();
        let reopened = Session::new(SessionOptions::default(), Some(LocalStore::open(dir.path())));
        assert!(reopened.history().is_empty());
    }

    #[test]
    fn test_voice_input() {
        let mut s = session();
        s.voice_input(Ok("dictated text".into()));
        assert_eq!(s.input(), "dictated text");

        s.voice_input(Err(anyhow::anyhow!("mic unplugged")));
        assert_eq!(texts(&s), vec![VOICE_ERROR_MESSAGE]);
    }

    #[test]
    fn test_import_alerts_on_unsupported() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("notes.txt");
        let bad = dir.path().join("notes.rtf");
        std::fs::write(&good, "imported").unwrap();
        std::fs::write(&bad, "{\\rtf1}").unwrap();

        let mut s = session();
        assert!(s.import_path(&good));
        assert_eq!(s.input(), "imported");
        assert!(s.alert().is_none());

        assert!(!s.import_path(&bad));
        assert_eq!(s.alert(), Some(UNSUPPORTED_MESSAGE));
        assert_eq!(s.input(), "imported");
        assert!(s.transcript().is_empty());

        s.dismiss_alert();
        assert!(s.alert().is_none());
    }

    #[test]
    fn test_summary_escape_sequences_stripped() {
        let mut s = session();
        s.set_input("x");
        s.begin(Endpoint::Summarize).unwrap();
        s.complete(summary_ok(Endpoint::Summarize, "\x1b[2Jclean"), Instant::now());
        s.finish_reveal();
        assert_eq!(texts(&s), vec!["clean"]);
    }

    #[test]
    fn test_memory_toggle() {
        let mut s = session();
        assert!(s.set_memory(None));
        assert!(!s.set_memory(None));
        assert!(s.set_memory(Some(true)));
        s.set_language("  ");
        assert_eq!(s.options().language, "auto");
    }
}
