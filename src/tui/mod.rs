//! Interactive chat interface.

mod app;
mod events;
mod layout;
mod rendering;
mod terminal;
mod timestamps;

use anyhow::{Context, Result};
pub use app::App;
pub use terminal::TerminalManager;

use crate::config::AppConfig;
use crate::gateway::SummaryClient;
use crate::storage::LocalStore;

/// Run the interactive chat until the user quits
pub fn run_interactive(config: &AppConfig, store: Option<LocalStore>) -> Result<()> {
    // Network and speech recognition run here; the UI loop stays on this thread
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .thread_name("briefly-io")
        .build()
        .context("Failed to start the I/O runtime")?;

    let client = SummaryClient::new(config.backend.base_url.clone());
    let mut app = App::new(config, store, client, runtime.handle().clone());

    let mut manager = TerminalManager::new()?;
    let res = app.run(manager.terminal_mut());
    manager.restore()?;

    drop(app);
    runtime.shutdown_background();
    res
}
