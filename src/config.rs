//! Teller Configuration
//!
//! Loads and saves the agent's configuration from `~/.teller/teller.json`.
//! The blocked-register policy and token vocabulary live here and are
//! read-only for the rest of the subsystem.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::types::{default_config, AgentConfig};

/// Directory name under the user's home for all teller data.
const TELLER_DIR_NAME: &str = ".teller";

/// Config file name within the teller directory.
const CONFIG_FILENAME: &str = "teller.json";

/// Returns the teller base directory: `~/.teller`.
pub fn get_teller_dir() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/root"));
    home.join(TELLER_DIR_NAME)
}

/// Returns the full path to the config file: `~/.teller/teller.json`.
pub fn get_config_path() -> PathBuf {
    get_teller_dir().join(CONFIG_FILENAME)
}

/// Load the agent config from disk, merging missing fields with defaults.
///
/// Returns `None` if the config file does not exist or cannot be parsed.
pub fn load_config() -> Option<AgentConfig> {
    let config_path = get_config_path();
    if !config_path.exists() {
        return None;
    }

    let contents = fs::read_to_string(&config_path).ok()?;
    let mut config: AgentConfig = serde_json::from_str(&contents).ok()?;

    // Merge defaults for unset fields
    let defaults = default_config();

    if config.name.is_empty() {
        config.name = defaults.name;
    }
    if config.chain.is_empty() {
        config.chain = defaults.chain;
    }
    if config.known_tokens.is_empty() {
        config.known_tokens = defaults.known_tokens;
    }
    if config.register_max_age_secs == 0 {
        config.register_max_age_secs = defaults.register_max_age_secs;
    }
    if config.version.is_empty() {
        config.version = defaults.version;
    }

    Some(config)
}

/// Save the agent config to disk at `~/.teller/teller.json`.
///
/// Creates the teller directory with mode 0o700 if it does not exist.
/// The config file is written with mode 0o600 since it names the active
/// wallet.
pub fn save_config(config: &AgentConfig) -> Result<()> {
    let dir = get_teller_dir();
    if !dir.exists() {
        fs::create_dir_all(&dir).context("Failed to create teller directory")?;
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o700))?;
    }

    let config_path = get_config_path();
    let json = serde_json::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(&config_path, &json).context("Failed to write config file")?;
    fs::set_permissions(&config_path, fs::Permissions::from_mode(0o600))?;

    Ok(())
}
