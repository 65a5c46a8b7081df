use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

use crate::export::ExportFormat;
use crate::models::Endpoint;

/// User actions from terminal events
#[derive(Debug, PartialEq)]
pub enum Action {
    Quit,
    /// Close the alert, the history panel, or leave the app
    Escape,
    /// Enter: run a slash command, Ask, or replay the selected history entry
    Submit,
    Send(Endpoint),
    InsertNewline,
    InsertChar(char),
    DeleteChar,
    Paste(String),
    Rephrase,
    ClearMemory,
    Copy,
    Export(ExportFormat),
    Speak,
    StopSpeaking,
    VoiceInput,
    CycleTheme,
    CycleEffect,
    DeleteDraft,
    ToggleHistory,
    ClearHistory,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    Click { column: u16, row: u16 },
    Pointer { column: u16, row: u16 },
    Resize { columns: u16, rows: u16 },
    None,
}

/// Poll for a terminal event and convert it to an action
pub fn poll_event(timeout: Duration) -> anyhow::Result<Action> {
    if event::poll(timeout)? {
        return Ok(event_to_action(event::read()?));
    }
    Ok(Action::None)
}

fn event_to_action(event: Event) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => key_to_action(key),
        Event::Mouse(mouse) => mouse_to_action(mouse),
        Event::Paste(text) => Action::Paste(text),
        Event::Resize(columns, rows) => Action::Resize { columns, rows },
        _ => Action::None,
    }
}

fn key_to_action(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Esc, _) => Action::Escape,

        // Backend actions
        (KeyCode::Enter, KeyModifiers::ALT) | (KeyCode::Enter, KeyModifiers::SHIFT) => {
            Action::InsertNewline
        }
        (KeyCode::Enter, _) => Action::Submit,
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => Action::Send(Endpoint::Summarize),
        (KeyCode::Char('b'), KeyModifiers::CONTROL) => Action::Send(Endpoint::Bullets),
        (KeyCode::Char('t'), KeyModifiers::CONTROL) => Action::Send(Endpoint::Takeaways),
        (KeyCode::Char('l'), KeyModifiers::CONTROL) => Action::Send(Endpoint::ExtractLinks),
        (KeyCode::Char('r'), KeyModifiers::CONTROL) => Action::Rephrase,
        (KeyCode::Char('k'), KeyModifiers::CONTROL) => Action::ClearMemory,

        // Output
        (KeyCode::Char('y'), KeyModifiers::CONTROL) => Action::Copy,
        (KeyCode::F(2), _) => Action::Export(ExportFormat::Text),
        (KeyCode::F(3), _) => Action::Export(ExportFormat::Document),
        (KeyCode::F(4), _) => Action::Speak,
        (KeyCode::F(5), _) => Action::StopSpeaking,
        (KeyCode::F(6), _) => Action::VoiceInput,

        // Appearance and local state
        (KeyCode::F(7), _) => Action::CycleTheme,
        (KeyCode::F(8), _) => Action::CycleEffect,
        (KeyCode::F(9), _) => Action::DeleteDraft,
        (KeyCode::Tab, _) => Action::ToggleHistory,
        (KeyCode::Char('x'), KeyModifiers::CONTROL) => Action::ClearHistory,

        // Navigation
        (KeyCode::Char('p'), KeyModifiers::CONTROL) => Action::MoveUp,
        (KeyCode::Char('n'), KeyModifiers::CONTROL) => Action::MoveDown,
        (KeyCode::Up, _) => Action::MoveUp,
        (KeyCode::Down, _) => Action::MoveDown,
        (KeyCode::PageUp, _) => Action::PageUp,
        (KeyCode::PageDown, _) => Action::PageDown,

        // Text input
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            Action::InsertChar(c)
        }
        (KeyCode::Backspace, _) => Action::DeleteChar,

        _ => Action::None,
    }
}

fn mouse_to_action(mouse: MouseEvent) -> Action {
    let (column, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Action::Click { column, row },
        MouseEventKind::Moved | MouseEventKind::Drag(_) => Action::Pointer { column, row },
        MouseEventKind::ScrollUp => Action::PageUp,
        MouseEventKind::ScrollDown => Action::PageDown,
        _ => Action::None,
    }
}
