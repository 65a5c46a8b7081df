//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use briefly::history::SummaryHistory;
use briefly::storage::LocalStore;
use tempfile::TempDir;

/// Builder for an isolated briefly home: data directory, config file and input files
pub struct HomeBuilder {
    temp_dir: TempDir,
    config: String,
}

impl HomeBuilder {
    /// Create a new builder with an empty data directory and an empty config
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir, config: String::new() }
    }

    /// Path to the data directory (`BRIEFLY_HOME`)
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Point the backend at `base_url`
    pub fn with_backend(mut self, base_url: &str) -> Self {
        self.config.push_str(&format!("[backend]\nbase_url = \"{}\"\n", base_url));
        self
    }

    /// Seed the summary history, given newest first
    pub fn with_history(self, entries: &[&str]) -> Self {
        let mut history = SummaryHistory::new();
        for entry in entries.iter().rev() {
            history.push(*entry);
        }
        let mut store = LocalStore::open(self.temp_dir.path());
        store.save_history(&history);
        self
    }

    /// Seed the saved draft
    pub fn with_draft(self, draft: &str) -> Self {
        let mut store = LocalStore::open(self.temp_dir.path());
        store.save_draft(draft);
        self
    }

    /// Add an input file and return the builder
    pub fn with_file(self, name: &str, content: &[u8]) -> Self {
        fs::write(self.temp_dir.path().join(name), content).expect("Failed to write input file");
        self
    }

    /// Path of a file created with [`with_file`](Self::with_file)
    pub fn file(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join("config.toml")
    }

    /// Write the config and return a command running the binary in this home
    pub fn command(&self) -> Command {
        fs::write(self.config_path(), &self.config).expect("Failed to write config");
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_briefly"));
        cmd.env("BRIEFLY_HOME", self.temp_dir.path())
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.config_path());
        cmd
    }

    /// Re-read the persisted store
    pub fn store(&self) -> LocalStore {
        LocalStore::open(self.temp_dir.path())
    }
}

impl Default for HomeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimal one-page PDF whose page shows `text`
pub fn pdf_with_text(text: &str) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![100.into(), 600.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().expect("encode content")));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("save pdf");
    bytes
}
