//! Copying the transcript to the system clipboard.

use anyhow::{Context, Result};
use arboard::Clipboard;

/// Largest payload accepted (10MB)
pub const MAX_CLIPBOARD_SIZE: usize = 10 * 1024 * 1024;

/// Anything that can receive text. Swapped for a fake in tests.
pub trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The platform clipboard, opened on first use
#[derive(Default)]
pub struct SystemClipboard {
    clipboard: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let clipboard = match &mut self.clipboard {
            Some(clipboard) => clipboard,
            slot => slot.insert(Clipboard::new().context("Failed to initialize clipboard")?),
        };
        clipboard.set_text(text).context("Failed to set clipboard contents")?;
        Ok(())
    }
}

/// Reject empty and oversized payloads before touching the clipboard
pub fn validate_clipboard_text(text: &str) -> Result<()> {
    if text.is_empty() {
        anyhow::bail!("Cannot copy empty text to clipboard");
    }
    if text.len() > MAX_CLIPBOARD_SIZE {
        anyhow::bail!("Text too large for clipboard ({} bytes, max {})", text.len(), MAX_CLIPBOARD_SIZE);
    }
    Ok(())
}

pub fn copy_with_provider(text: &str, provider: &mut dyn ClipboardProvider) -> Result<()> {
    validate_clipboard_text(text)?;
    provider.set_text(text)
}

/// Copy `text` to the system clipboard
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    copy_with_provider(text, &mut SystemClipboard::new())
}
