//! Shared value types.
//!
//! - [`ChatMessage`] / [`Sender`] - transcript entries
//! - [`EffectKind`] - which decorative background is animating
//! - [`Theme`] - colour theme and its side effects
//! - [`Endpoint`] / [`SummaryMode`] - backend actions and request options

pub mod effect;
pub mod endpoint;
pub mod message;
pub mod theme;

pub use effect::EffectKind;
pub use endpoint::{Endpoint, SummaryMode};
pub use message::{ChatMessage, MessageId, Sender};
pub use theme::{Palette, Theme, ThemeEffect};
