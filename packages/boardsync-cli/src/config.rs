/// Configuration for the boardsync host.
/// Reads config.json from ~/.config/boardsync/config.json (or platform equivalent).

use boardsync_core::config::BoardConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config path: ~/.config/boardsync/config.json
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("boardsync")
        .join("config.json")
}

/// Default store directory: ~/.local/share/boardsync/store
pub fn default_store_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("boardsync")
        .join("store")
}

/// Load config from path. Returns default if the file doesn't exist or can't be parsed.
pub fn load_config(path: &Path) -> BoardConfig {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("Failed to parse config {}: {}", path.display(), e);
            BoardConfig::default()
        }),
        Err(_) => {
            log::info!("No config at {}, using defaults", path.display());
            BoardConfig::default()
        }
    }
}

/// Store directory for a loaded config.
pub fn store_dir(config: &BoardConfig) -> PathBuf {
    config
        .store_dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(default_store_dir)
}
