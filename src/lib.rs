//! briefly - chat with a text-summarization backend from the terminal
//!
//! The crate is a front end only: summaries come from an HTTP backend, and
//! everything around them lives here:
//!
//! - A chat transcript with a typing indicator and progressive reveal of replies
//! - A floating keyword cloud built from each summary; clicking a word asks
//!   for a summary focused on it
//! - An animated wireframe scene plus switchable background effects
//! - Summary history, draft auto-save, theme and effect persistence
//! - Text/PDF import, text/document export, clipboard copy and speech
//!
//! # Example
//!
//! ```
//! use briefly::keywords::extract_top_keywords;
//!
//! let keywords = extract_top_keywords("Rust makes systems programming safe. Rust is fast.", 3);
//! assert_eq!(keywords[0].word, "rust");
//! assert_eq!(keywords[0].count, 2);
//! ```

pub mod chat;
pub mod cli;
pub mod clipboard;
pub mod commands;
pub mod config;
pub mod effects;
pub mod export;
pub mod gateway;
pub mod history;
pub mod import;
pub mod keywords;
pub mod models;
pub mod scene;
pub mod session;
pub mod speech;
pub mod storage;
pub mod tui;
pub mod utils;
pub mod wordcloud;

// Re-export commonly used types
pub use config::AppConfig;
pub use gateway::{GatewayError, SummaryClient, SummaryRequest};
pub use history::SummaryHistory;
pub use keywords::{Keyword, extract_top_keywords};
pub use session::{Session, SessionOptions};
pub use storage::LocalStore;
