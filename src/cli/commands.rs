use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use crate::config::{AppConfig, ConfigOverrides};
use crate::gateway::{SummaryClient, SummaryRequest};
use crate::history::history_label;
use crate::import::import_file;
use crate::keywords::extract_top_keywords;
use crate::models::{Endpoint, SummaryMode};
use crate::session::EMPTY_INPUT_WARNING;
use crate::storage::LocalStore;
use crate::tui::run_interactive;
use crate::utils::{format_path_with_tilde, get_config_path, get_data_dir, init_logging, strip_ansi_codes};

#[derive(Parser)]
#[command(name = "briefly")]
#[command(version)]
#[command(about = "Chat with a text-summarization backend from the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file (default: <config dir>/briefly/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Summary language sent to the backend
    #[arg(long, global = true)]
    pub language: Option<String>,

    /// Summary length: short, medium or long
    #[arg(long, global = true)]
    pub mode: Option<SummaryMode>,

    /// Let the backend remember the conversation (true/false)
    #[arg(long, global = true)]
    pub memory: Option<bool>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive chat (default)
    Chat,
    /// Summarize a .txt/.pdf file, or stdin with `-`, and print the result
    Summarize {
        /// Backend action: summarize, bullets, takeaways, links or ask
        #[arg(long, default_value = "summarize")]
        endpoint: Endpoint,
        input: PathBuf,
    },
    /// Print the most frequent keywords of a file, or stdin with `-`
    Keywords {
        #[arg(long, default_value_t = 16)]
        max: usize,
        input: PathBuf,
    },
    /// List saved summaries, newest first
    History {
        /// Delete every saved summary
        #[arg(long)]
        clear: bool,
    },
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_url: self.base_url.clone(),
            language: self.language.clone(),
            mode: self.mode,
            memory: self.memory,
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref(), get_config_path().as_deref())?;
    config.apply_overrides(cli.overrides());
    let data_dir = match &config.storage.data_dir {
        Some(dir) => dir.clone(),
        None => get_data_dir()?,
    };

    // Logging is a convenience; a read-only data dir must not stop the app
    let _guard = match init_logging(&data_dir.join("logs")) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {:#}", e);
            None
        }
    };
    tracing::info!(data_dir = %data_dir.display(), "Starting briefly");

    let store = LocalStore::open(&data_dir);
    match cli.command {
        None | Some(Commands::Chat) => run_interactive(&config, Some(store)),
        Some(Commands::Summarize { endpoint, input }) => summarize(&config, store, endpoint, &input),
        Some(Commands::Keywords { max, input }) => show_keywords(&input, max),
        Some(Commands::History { clear }) => show_history(store, clear),
    }
}

/// File contents, or stdin when `input` is `-`
fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text).context("Failed to read stdin")?;
        return Ok(text);
    }
    Ok(import_file(input)?)
}

fn summarize(config: &AppConfig, mut store: LocalStore, endpoint: Endpoint, input: &Path) -> Result<()> {
    let text = read_input(input)?;
    let text = text.trim();
    if text.is_empty() {
        bail!("{}", EMPTY_INPUT_WARNING);
    }

    let request = SummaryRequest::new(text)
        .with_language(config.backend.language.clone())
        .with_memory(config.backend.memory)
        .with_mode(config.backend.mode);
    let client = SummaryClient::new(config.backend.base_url.clone());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the I/O runtime")?;
    let summary = runtime
        .block_on(client.summarize(endpoint, &request))
        .with_context(|| format!("{} request to {} failed", endpoint.label(), client.base_url()))?;
    let summary = strip_ansi_codes(&summary);

    let mut history = store.history();
    history.push(summary.clone());
    store.save_history(&history);

    println!("{}", summary);
    Ok(())
}

fn show_keywords(input: &Path, max: usize) -> Result<()> {
    let text = read_input(input)?;
    for keyword in extract_top_keywords(&text, max) {
        println!("{}\t{}", keyword.word, keyword.count);
    }
    Ok(())
}

fn show_history(mut store: LocalStore, clear: bool) -> Result<()> {
    if clear {
        store.clear_history();
        println!("History cleared");
        return Ok(());
    }

    let history = store.history();
    if history.is_empty() {
        println!("No saved summaries");
        return Ok(());
    }

    println!("Saved summaries ({})", history.len());
    println!("================================");
    for (idx, entry) in history.entries().iter().enumerate() {
        println!("{:>2}. {}", idx + 1, history_label(&entry.replace('\n', " ")));
    }
    println!();
    println!("State file: {}", format_path_with_tilde(store.path()));
    Ok(())
}
