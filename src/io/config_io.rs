use std::fs;
use std::path::Path;

use super::ConfigError;
use crate::model::config::BoardConfig;

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "board.toml";

/// Read and parse a board config file.
pub fn read_config(path: &Path) -> Result<BoardConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config: BoardConfig = toml::from_str(&text)?;
    Ok(config)
}

/// Resolve the config for a run. An explicit path must exist; otherwise
/// `board.toml` in `dir` is used when present, and built-in defaults when not.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<BoardConfig, ConfigError> {
    if let Some(path) = explicit {
        return read_config(path);
    }
    let fallback = dir.join(DEFAULT_CONFIG_FILE);
    if fallback.is_file() {
        read_config(&fallback)
    } else {
        Ok(BoardConfig::default())
    }
}
