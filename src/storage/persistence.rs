//! State file persistence: load/save with atomic writes

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// State file schema version; mismatching files are ignored
pub const STORE_VERSION: u32 = 1;

/// On-disk layout of the key/value store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreFile {
    pub version: u32,
    pub entries: BTreeMap<String, String>,
}

impl Default for StoreFile {
    fn default() -> Self {
        Self { version: STORE_VERSION, entries: BTreeMap::new() }
    }
}

/// Load the state file.
/// Returns None if the file is missing, corrupted, or from another version.
pub fn load_store(path: &Path) -> Result<Option<StoreFile>> {
    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(path).context("Failed to read state file")?;
    let store: StoreFile = match serde_json::from_str(&json) {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "State file is corrupted, starting fresh");
            return Ok(None);
        }
    };

    if store.version != STORE_VERSION {
        tracing::warn!(
            expected = STORE_VERSION,
            found = store.version,
            "State file version mismatch, starting fresh"
        );
        return Ok(None);
    }

    Ok(Some(store))
}

/// Save the state file atomically (temp file + rename)
pub fn save_store(path: &Path, store: &StoreFile) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).context("Failed to create state directory")?;
    }

    let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let temp = path.with_file_name(format!("{}.tmp", file_name));
    let json = serde_json::to_string_pretty(store).context("Failed to serialize state")?;
    fs::write(&temp, json).context("Failed to write state temp file")?;
    fs::rename(&temp, path).context("Failed to rename state temp file")?;

    Ok(())
}
