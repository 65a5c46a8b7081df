//! TUI application state and event handling.
//!
//! `App` glues the UI-independent [`Session`] to the terminal:
//!
//! - **Frame tick**: scene, background effect, confetti, word cloud and reveal
//!   all advance once per frame; nothing blocks the loop
//! - **Backend results**: jobs go to the [`Dispatcher`] and their outcomes are
//!   polled every frame, so all state changes happen on this thread
//! - **Slash commands**: an input line starting with `/` is parsed by
//!   [`parse_command`] instead of being sent
//! - **Status messages**: transient feedback for clipboard, export and errors
//!
//! # Example
//!
//! ```rust,ignore
//! let mut app = App::new(&config, store, client, runtime.handle().clone());
//! app.run(terminal)?;
//! ```

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::layout::Rect;
use tokio::runtime::Handle;
use tokio::sync::oneshot;

use super::events::{Action, poll_event};
use super::layout::{AppLayout, inner_position};
use super::rendering::{RenderState, render_ui};
use crate::clipboard::{ClipboardProvider, SystemClipboard};
use crate::commands::{Command, parse_command};
use crate::config::AppConfig;
use crate::effects::confetti::Confetti;
use crate::effects::{Bounds, EffectSwitcher};
use crate::export::ExportFormat;
use crate::gateway::{Dispatcher, Job, SummaryClient};
use crate::history::SummaryHistory;
use crate::models::{EffectKind, Endpoint, Theme, ThemeEffect};
use crate::scene::Scene;
use crate::session::{Session, SessionOptions};
use crate::speech::{Speaker, recognize};
use crate::storage::LocalStore;
use crate::utils::{format_path_with_tilde, parse_dropped_path};

/// Duration for success status messages (milliseconds)
const STATUS_SUCCESS_DURATION_MS: u64 = 3000;
/// Duration for error status messages (milliseconds)
const STATUS_ERROR_DURATION_MS: u64 = 5000;
/// Rows moved by PageUp/PageDown
const PAGE_ROWS: usize = 10;
/// Length of one cyberpunk flicker step
const FLICKER_STEP_MS: u128 = 120;

/// Type of status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
}

/// Transient status message with expiry
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub message_type: MessageType,
    pub expires_at: Instant,
}

/// Open history panel: search query and the selected match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryPanel {
    pub query: String,
    pub selected: usize,
    /// History indices matching `query`, newest first
    pub matches: Vec<usize>,
}

impl HistoryPanel {
    pub fn new(history: &SummaryHistory) -> Self {
        let mut panel = Self::default();
        panel.refresh(history);
        panel
    }

    pub fn refresh(&mut self, history: &SummaryHistory) {
        self.matches = history.search(&self.query);
        self.selected = self.selected.min(self.matches.len().saturating_sub(1));
    }

    /// First visible row when `visible` rows fit
    pub fn offset(&self, visible: usize) -> usize {
        self.selected.saturating_sub(visible.saturating_sub(1))
    }

    fn move_selection(&mut self, delta: isize) {
        if self.matches.is_empty() {
            return;
        }
        let max = self.matches.len() - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(max);
    }

    fn selected_entry(&self) -> Option<usize> {
        self.matches.get(self.selected).copied()
    }
}

/// Cyberpunk accent flicker: dark for one step in every nine
fn flicker_on(elapsed: Duration) -> bool {
    (elapsed.as_millis() / FLICKER_STEP_MS) % 9 != 0
}

pub struct App {
    session: Session,
    dispatcher: Dispatcher,
    handle: Handle,
    speaker: Speaker,
    stt_command: Option<String>,
    voice_rx: Option<oneshot::Receiver<Result<String>>>,
    clipboard: Box<dyn ClipboardProvider>,
    scene: Scene,
    effects: EffectSwitcher,
    confetti: Confetti,
    theme: Theme,
    export_dir: PathBuf,
    history_panel: Option<HistoryPanel>,
    status_message: Option<StatusMessage>,
    chat_scroll: u16,
    last_revision: u64,
    area: Rect,
    frame_interval: Duration,
    started: Instant,
    should_quit: bool,
}

impl App {
    /// Build the app, restoring theme, background effect and draft from `store`
    pub fn new(config: &AppConfig, store: Option<LocalStore>, client: SummaryClient, handle: Handle) -> Self {
        let theme = store.as_ref().map(LocalStore::theme).unwrap_or_default();
        let effect = store.as_ref().map(LocalStore::effect).unwrap_or_default();
        let area = Rect::new(0, 0, 80, 24);
        let now = Instant::now();

        let mut app = Self {
            session: Session::new(SessionOptions::from_config(config), store),
            dispatcher: Dispatcher::new(client, handle.clone()),
            handle,
            speaker: Speaker::new(config.speech.tts_command.clone(), config.speech.voice.clone()),
            stt_command: config.speech.stt_command.clone(),
            voice_rx: None,
            clipboard: Box::new(SystemClipboard::new()),
            scene: Scene::new(),
            effects: EffectSwitcher::new(Bounds::from_cells(area.width, area.height)),
            confetti: Confetti::new(),
            theme,
            export_dir: config.ui.export_dir.clone().unwrap_or_else(|| PathBuf::from(".")),
            history_panel: None,
            status_message: None,
            chat_scroll: 0,
            last_revision: 0,
            area,
            frame_interval: config.ui.frame_interval(),
            started: now,
            should_quit: false,
        };
        app.apply_theme_effect(theme, now);
        if effect != EffectKind::None {
            app.effects.start(effect, now);
        }
        app.resize(area.width, area.height);
        app
    }

    /// Swap the system clipboard, e.g. for a fake in tests
    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardProvider>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let size = terminal.size()?;
        self.resize(size.width, size.height);

        while !self.should_quit {
            let now = Instant::now();
            self.check_and_clear_expired_status(now);
            self.frame(now);

            terminal.draw(|f| render_ui(f, &self.render_state(now)))?;

            // Drain everything that queued up during the frame
            let timeout = self.frame_interval.saturating_sub(now.elapsed());
            let mut action = poll_event(timeout)?;
            while action != Action::None {
                self.handle_action(action, Instant::now());
                action = poll_event(Duration::ZERO)?;
            }
        }

        self.speaker.stop();
        self.dispatcher.cancel();
        Ok(())
    }

    fn render_state(&self, now: Instant) -> RenderState<'_> {
        RenderState {
            session: &self.session,
            scene: &self.scene,
            effects: &self.effects,
            confetti: &self.confetti,
            theme: self.theme,
            accent_on: !self.theme.flickers() || flicker_on(now.saturating_duration_since(self.started)),
            history_panel: self.history_panel.as_ref(),
            status_message: self.status_message.as_ref(),
            chat_scroll: self.chat_scroll,
            now,
        }
    }

    /// Advance every animation one frame and collect finished background work
    fn frame(&mut self, now: Instant) {
        self.scene.step(now.saturating_duration_since(self.started));
        self.effects.tick(now);
        self.confetti.tick();

        while let Some(completed) = self.dispatcher.try_next() {
            tracing::info!(id = completed.id, "Request completed");
            self.session.complete(completed.outcome, now);
            self.refresh_history_panel();
        }
        self.poll_voice();

        self.session.tick(now);
        if self.session.take_celebration() {
            self.confetti.launch(Bounds::from_cells(self.area.width, self.area.height));
        }

        // New content snaps the transcript back to the tail
        let revision = self.session.transcript().revision();
        if revision != self.last_revision {
            self.last_revision = revision;
            self.chat_scroll = 0;
        }
    }

    fn poll_voice(&mut self) {
        let Some(rx) = self.voice_rx.as_mut() else {
            return;
        };
        match rx.try_recv() {
            Ok(result) => {
                self.voice_rx = None;
                self.session.voice_input(result);
            }
            Err(oneshot::error::TryRecvError::Empty) => {}
            Err(oneshot::error::TryRecvError::Closed) => {
                self.voice_rx = None;
                self.session.voice_input(Err(anyhow!("Speech recognition stopped unexpectedly")));
            }
        }
    }

    /// Set a transient status message with automatic expiry
    fn set_status(&mut self, text: impl Into<String>, message_type: MessageType, duration_ms: u64) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            message_type,
            expires_at: Instant::now() + Duration::from_millis(duration_ms),
        });
    }

    fn success(&mut self, text: impl Into<String>) {
        self.set_status(text, MessageType::Success, STATUS_SUCCESS_DURATION_MS);
    }

    fn error(&mut self, text: impl Into<String>) {
        self.set_status(text, MessageType::Error, STATUS_ERROR_DURATION_MS);
    }

    /// Check and clear expired status messages
    fn check_and_clear_expired_status(&mut self, now: Instant) {
        if self.status_message.as_ref().is_some_and(|msg| now >= msg.expires_at) {
            self.status_message = None;
        }
    }

    /// Handle a user action (extracted for testing)
    fn handle_action(&mut self, action: Action, now: Instant) {
        // A blocking alert swallows everything but its dismissal
        if self.session.alert().is_some() {
            match action {
                Action::Quit => self.should_quit = true,
                Action::Escape | Action::Submit => self.session.dismiss_alert(),
                Action::Resize { columns, rows } => self.resize(columns, rows),
                _ => {}
            }
            return;
        }

        match action {
            Action::Quit => self.should_quit = true,
            Action::Escape => self.escape(),
            Action::Submit => self.submit_input(now),
            Action::Send(endpoint) => self.send(endpoint),
            Action::InsertNewline => {
                if self.history_panel.is_none() {
                    self.session.push_char('\n');
                }
            }
            Action::InsertChar(c) => match self.history_panel.as_mut() {
                Some(panel) => {
                    panel.query.push(c);
                    panel.selected = 0;
                    self.refresh_history_panel();
                }
                None => self.session.push_char(c),
            },
            Action::DeleteChar => match self.history_panel.as_mut() {
                Some(panel) => {
                    panel.query.pop();
                    self.refresh_history_panel();
                }
                None => {
                    self.session.pop_char();
                }
            },
            Action::Paste(text) => self.paste(&text),
            Action::Rephrase => match self.session.begin_rephrase() {
                Some(job) => self.submit(job),
                None => self.error("✗ Nothing to rephrase yet"),
            },
            Action::ClearMemory => {
                let job = self.session.begin_clear_memory();
                self.submit(job);
            }
            Action::Copy => self.copy(),
            Action::Export(format) => self.export(format),
            Action::Speak => self.speak(),
            Action::StopSpeaking => {
                if self.speaker.stop() {
                    self.success("✓ Speech stopped");
                }
            }
            Action::VoiceInput => self.start_voice_input(),
            Action::CycleTheme => self.set_theme(self.theme.next(), now),
            Action::CycleEffect => self.set_effect(self.effects.active_kind().next(), now),
            Action::DeleteDraft => self.session.delete_draft(),
            Action::ToggleHistory => self.toggle_history(),
            Action::ClearHistory => {
                self.session.clear_history();
                self.refresh_history_panel();
                self.success("✓ History cleared");
            }
            Action::MoveUp => self.navigate(-1),
            Action::MoveDown => self.navigate(1),
            Action::PageUp => self.navigate(-(PAGE_ROWS as isize)),
            Action::PageDown => self.navigate(PAGE_ROWS as isize),
            Action::Click { column, row } => self.click(column, row, now),
            Action::Pointer { column, row } => {
                self.scene.set_pointer_cell(column, row, self.area.width, self.area.height);
            }
            Action::Resize { columns, rows } => self.resize(columns, rows),
            Action::None => {}
        }
    }

    /// Close the panel, else cancel the running request, else quit
    fn escape(&mut self) {
        if self.history_panel.take().is_some() {
            self.sync_layout();
        } else if self.dispatcher.is_pending() {
            self.dispatcher.cancel();
            self.session.abandon();
            self.error("✗ Request cancelled");
        } else {
            self.should_quit = true;
        }
    }

    fn submit_input(&mut self, now: Instant) {
        if let Some(panel) = &self.history_panel {
            if let Some(idx) = panel.selected_entry() {
                self.session.replay_history(idx, now);
            }
            return;
        }

        match parse_command(self.session.input()) {
            Ok(Some(command)) => {
                self.session.set_input("");
                self.execute(command, now);
            }
            Ok(None) => self.send(Endpoint::Ask),
            Err(e) => self.error(format!("✗ {}", e)),
        }
    }

    fn execute(&mut self, command: Command, now: Instant) {
        match command {
            Command::Open(path) => self.import(&path),
            Command::Language(language) => {
                self.session.set_language(language);
                self.success(format!("✓ Language: {}", self.session.options().language));
            }
            Command::Mode(mode) => {
                self.session.set_mode(mode);
                self.success(format!("✓ Mode: {}", mode));
            }
            Command::Memory(memory) => {
                let on = self.session.set_memory(memory);
                self.success(if on { "✓ Memory on" } else { "✓ Memory off" });
            }
            Command::Theme(theme) => self.set_theme(theme, now),
            Command::Effect(kind) => self.set_effect(kind, now),
            Command::Voice(voice) => {
                let label = voice.clone().unwrap_or_else(|| "default".to_string());
                self.speaker.set_voice(voice);
                self.success(format!("✓ Voice: {}", label));
            }
            Command::ClearHistory => {
                self.session.clear_history();
                self.refresh_history_panel();
                self.success("✓ History cleared");
            }
            Command::Help => self.session.notify(Command::USAGE),
        }
    }

    fn send(&mut self, endpoint: Endpoint) {
        if let Some(job) = self.session.begin(endpoint) {
            self.submit(job);
        }
    }

    fn submit(&mut self, job: Job) {
        let id = self.dispatcher.submit(job);
        tracing::debug!(id, "Request submitted");
        self.chat_scroll = 0;
    }

    /// A pasted path to an existing file is an import, anything else is text
    fn paste(&mut self, text: &str) {
        if let Some(panel) = self.history_panel.as_mut() {
            panel.query.push_str(text.trim());
            self.refresh_history_panel();
            return;
        }
        match parse_dropped_path(text) {
            Some(path) => self.import(&path),
            None => self.session.push_str(text),
        }
    }

    fn import(&mut self, path: &Path) {
        if self.session.import_path(path) {
            tracing::info!(path = %path.display(), "Imported file");
            self.success(format!("✓ Imported {}", format_path_with_tilde(path)));
        }
    }

    fn copy(&mut self) {
        if !self.session.exports_enabled() {
            self.error("✗ Nothing to copy yet");
            return;
        }
        match self.session.copy_summary(self.clipboard.as_mut()) {
            Ok(true) => {}
            Ok(false) => self.error("✗ Nothing to copy yet"),
            Err(e) => self.error(format!("✗ Clipboard error: {}", e)),
        }
    }

    fn export(&mut self, format: ExportFormat) {
        if !self.session.exports_enabled() {
            self.error("✗ Nothing to export yet");
            return;
        }
        match self.session.export(format, &self.export_dir) {
            Ok(Some(path)) => self.success(format!("✓ Saved {}", format_path_with_tilde(&path))),
            Ok(None) => self.error("✗ Nothing to export yet"),
            Err(e) => self.error(format!("✗ Export failed: {}", e)),
        }
    }

    fn speak(&mut self) {
        if !self.session.exports_enabled() {
            self.error("✗ Nothing to read yet");
            return;
        }
        let Some(text) = self.session.summary_text() else {
            return;
        };
        let language = self.session.options().language.clone();
        match self.speaker.speak(&text, &language) {
            Ok(()) => self.session.celebrate(),
            Err(e) => self.session.speech_failed(&e),
        }
    }

    fn start_voice_input(&mut self) {
        let Some(command) = self.stt_command.clone() else {
            self.session.voice_input(Err(anyhow!("No speech recognition command configured")));
            return;
        };
        if self.voice_rx.is_some() {
            return;
        }
        let (tx, rx) = oneshot::channel();
        self.handle.spawn(async move {
            let _ = tx.send(recognize(&command).await);
        });
        self.voice_rx = Some(rx);
        self.success("🎙️ Listening...");
    }

    /// Switch theme, persist it and apply its effect side effect
    fn set_theme(&mut self, theme: Theme, now: Instant) {
        self.theme = theme;
        if let Some(store) = self.session.store_mut() {
            store.save_theme(theme);
        }
        self.apply_theme_effect(theme, now);
        self.success(format!("✓ Theme: {}", theme));
    }

    fn apply_theme_effect(&mut self, theme: Theme, now: Instant) {
        match theme.effect() {
            ThemeEffect::Start(kind) => self.effects.start(kind, now),
            ThemeEffect::Stop => self.stop_background(),
            ThemeEffect::Keep => {}
        }
    }

    /// Stop the background effect together with the word cloud
    fn stop_background(&mut self) {
        self.effects.stop();
        self.session.word_cloud_mut().stop();
    }

    fn set_effect(&mut self, kind: EffectKind, now: Instant) {
        match kind {
            EffectKind::None => self.stop_background(),
            kind => self.effects.start(kind, now),
        }
        if let Some(store) = self.session.store_mut() {
            store.save_effect(kind);
        }
        self.success(format!("✓ Background: {}", kind));
    }

    fn toggle_history(&mut self) {
        self.history_panel = match self.history_panel.take() {
            Some(_) => None,
            None => Some(HistoryPanel::new(self.session.history())),
        };
        self.sync_layout();
    }

    fn refresh_history_panel(&mut self) {
        if let Some(panel) = self.history_panel.as_mut() {
            panel.refresh(self.session.history());
        }
    }

    fn navigate(&mut self, delta: isize) {
        match self.history_panel.as_mut() {
            Some(panel) => panel.move_selection(delta),
            None => {
                // Up scrolls back through the transcript
                let rows = u16::try_from(delta.unsigned_abs()).unwrap_or(u16::MAX);
                self.chat_scroll = if delta < 0 {
                    self.chat_scroll.saturating_add(rows)
                } else {
                    self.chat_scroll.saturating_sub(rows)
                };
            }
        }
    }

    fn layout(&self) -> AppLayout {
        AppLayout::new(self.area, self.history_panel.is_some())
    }

    fn click(&mut self, column: u16, row: u16, now: Instant) {
        let layout = self.layout();
        if let Some((x, y)) = inner_position(layout.cloud_area, column, row) {
            if let Some(job) = self.session.click_word_cloud(x, y) {
                self.submit(job);
            }
            return;
        }

        if let Some(area) = layout.history_area
            && let Some((_, y)) = inner_position(area, column, row)
            && let Some(panel) = self.history_panel.as_mut()
        {
            let visible = usize::from(area.height.saturating_sub(2));
            let target = panel.offset(visible) + usize::from(y);
            if target < panel.matches.len() {
                panel.selected = target;
                let idx = panel.matches[target];
                self.session.replay_history(idx, now);
            }
        }
    }

    fn resize(&mut self, columns: u16, rows: u16) {
        self.area = Rect::new(0, 0, columns, rows);
        self.effects.resize(Bounds::from_cells(columns, rows));
        self.sync_layout();
    }

    /// Keep the word cloud's space in step with its panel
    fn sync_layout(&mut self) {
        let cloud = self.layout().cloud_area;
        self.session
            .word_cloud_mut()
            .set_area(cloud.width.saturating_sub(2), cloud.height.saturating_sub(2));
    }
}
