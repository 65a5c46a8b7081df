//! Chat transcript: messages, typing indicator and progressive reveal.

pub mod markup;
pub mod reveal;
pub mod transcript;

pub use reveal::Revealer;
pub use transcript::{TYPING_TEXT, Transcript};
