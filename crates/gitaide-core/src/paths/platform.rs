//! Platform-specific config root resolution.

use std::env;
use std::path::PathBuf;

use super::error::PathError;

/// Environment variable overriding the config root.
pub const CONFIG_DIR_ENV: &str = "GITAIDE_CONFIG_DIR";

/// Get the root directory for configuration files.
///
/// Resolution order:
/// 1. `GITAIDE_CONFIG_DIR` environment variable (highest priority)
/// 2. System config directory (e.g., `~/.config/gitaide`)
pub fn config_root() -> Result<PathBuf, PathError> {
    if let Ok(path) = env::var(CONFIG_DIR_ENV) {
        if !path.trim().is_empty() {
            let path = PathBuf::from(path);
            if path.exists() && !path.is_dir() {
                return Err(PathError::NotADirectory(path));
            }
            return Ok(path);
        }
    }

    dirs::config_dir()
        .map(|dir| dir.join("gitaide"))
        .ok_or(PathError::NoConfigDir)
}

/// Resolve the directory commands operate in: `requested`, else the process cwd.
pub fn resolve_working_dir(requested: Option<PathBuf>) -> Result<PathBuf, PathError> {
    match requested {
        Some(dir) if !dir.is_dir() => Err(PathError::NotADirectory(dir)),
        Some(dir) => Ok(dir),
        None => env::current_dir().map_err(|e| PathError::CurrentDirError(e.to_string())),
    }
}
