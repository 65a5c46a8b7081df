use std::time::{Duration, Instant};

use chrono::Local;

use super::markup;
use crate::models::{ChatMessage, MessageId, Sender};

/// Text of the typing placeholder; dots are added when rendering
pub const TYPING_TEXT: &str = "Gemini is typing";

/// Period of the typing dots animation
const DOTS_PERIOD: Duration = Duration::from_millis(500);

/// Ordered chat transcript with at most one typing placeholder
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    next_id: MessageId,
    typing: Option<(MessageId, Instant)>,
    revision: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message. `text` is plain text and is escaped to markup.
    pub fn add_message(&mut self, sender: Sender, text: &str) -> MessageId {
        self.push(sender, markup::escape(text), false)
    }

    fn push(&mut self, sender: Sender, content: String, typing: bool) -> MessageId {
        let id = self.next_id;
        self.next_id += 1;
        let timestamp = if typing { None } else { Some(Local::now()) };
        self.messages.push(ChatMessage { id, sender, content, timestamp, typing });
        self.revision += 1;
        id
    }

    /// Show the typing placeholder unless one is already live
    pub fn show_typing(&mut self) -> MessageId {
        if let Some((id, _)) = self.typing {
            return id;
        }
        let id = self.push(Sender::Bot, TYPING_TEXT.to_string(), true);
        self.typing = Some((id, Instant::now()));
        id
    }

    /// Remove the typing placeholder if present
    pub fn hide_typing(&mut self) -> bool {
        let Some((id, _)) = self.typing.take() else {
            return false;
        };
        self.messages.retain(|m| m.id != id);
        self.revision += 1;
        true
    }

    pub fn is_typing(&self) -> bool {
        self.typing.is_some()
    }

    /// Number of dots (0-3) the placeholder shows at `now`
    pub fn typing_dots(&self, now: Instant) -> usize {
        self.typing
            .map(|(_, since)| {
                let ticks = now.saturating_duration_since(since).as_millis() / DOTS_PERIOD.as_millis();
                ((ticks + 1) % 4) as usize
            })
            .unwrap_or(0)
    }

    /// Append already-escaped markup to a message. False if the message is gone.
    pub fn append_markup(&mut self, id: MessageId, fragment: &str) -> bool {
        match self.messages.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                message.content.push_str(fragment);
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.typing = None;
        self.revision += 1;
    }

    pub fn get(&self, id: MessageId) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Bumped on every change; the view follows the tail when it moves
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Visible transcript text used for copy, export and speech
    pub fn plain_text(&self) -> String {
        self.messages
            .iter()
            .filter(|m| !m.typing)
            .map(|m| markup::decode(&m.content))
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }
}
