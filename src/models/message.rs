use chrono::{DateTime, Local};

/// Stable identifier of a transcript entry
pub type MessageId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// One transcript entry.
///
/// `content` is markup: text with `<br>` line breaks and `&lt;` `&gt;` `&amp;`
/// entities (see [`crate::chat::markup`]). Only the typing placeholder has no
/// timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub sender: Sender,
    pub content: String,
    pub timestamp: Option<DateTime<Local>>,
    pub typing: bool,
}

impl ChatMessage {
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}
