use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Overrides the data directory when set
pub const HOME_ENV: &str = "BRIEFLY_HOME";
const APP_DIR: &str = "briefly";
const CONFIG_FILENAME: &str = "config.toml";

/// Directory holding `state.json` and the log files
pub fn get_data_dir() -> Result<PathBuf> {
    if let Some(home) = env::var_os(HOME_ENV).filter(|h| !h.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    let base = dirs::data_dir().context("Could not determine the platform data directory")?;
    Ok(base.join(APP_DIR))
}

/// Default location of the configuration file, whether or not it exists
pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILENAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_env_override() {
        let original = env::var_os(HOME_ENV);

        // SAFETY: only this test touches BRIEFLY_HOME, and it is restored below
        unsafe {
            env::set_var(HOME_ENV, "/tmp/briefly-test-home");
        }
        let dir = get_data_dir().unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/briefly-test-home"));

        unsafe {
            match original {
                Some(value) => env::set_var(HOME_ENV, value),
                None => env::remove_var(HOME_ENV),
            }
        }
    }

    #[test]
    fn test_config_path_file_name() {
        if let Some(path) = get_config_path() {
            assert!(path.ends_with("briefly/config.toml"));
        }
    }
}
