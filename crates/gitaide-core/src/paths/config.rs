//! Locations of the configuration files inside the config root.

use std::path::PathBuf;

use super::error::PathError;
use super::platform::config_root;

/// Location of the JSON settings file.
pub fn settings_path() -> Result<PathBuf, PathError> {
    Ok(config_root()?.join("settings.json"))
}

/// Location of the `.env` file loaded at startup.
pub fn env_file_path() -> Result<PathBuf, PathError> {
    Ok(config_root()?.join(".env"))
}
