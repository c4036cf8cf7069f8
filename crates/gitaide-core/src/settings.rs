//! Settings domain types, validation and persistence.
//!
//! Settings are stored as JSON in the config root. Every field is optional so
//! that a partially written file, environment overrides and CLI flags can be
//! layered on top of each other.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::domain::ProviderKind;

/// Default session timeout (30 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 1800;

/// Longest accepted timeout (one day).
pub const MAX_TIMEOUT_SECS: u64 = 86_400;

/// Default line that cancels an interactive session.
pub const DEFAULT_EXIT_COMMAND: &str = "/exit";

/// Default branch PRs and reviews are compared against.
pub const DEFAULT_BASE_BRANCH: &str = "main";

/// Application settings structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Which assistant CLI to run.
    pub provider: Option<ProviderKind>,

    /// Path or name overriding the provider's default executable.
    pub provider_program: Option<String>,

    /// Model name passed through to the provider.
    pub model: Option<String>,

    /// Session timeout in seconds.
    pub timeout_secs: Option<u64>,

    /// Line that cancels an interactive session.
    pub exit_command: Option<String>,

    /// Whether assistant output is streamed to the terminal.
    pub streaming: Option<bool>,

    /// Base branch for reviews and pull requests.
    pub base_branch: Option<String>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            provider: Some(ProviderKind::Claude),
            provider_program: None,
            model: None,
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            exit_command: Some(DEFAULT_EXIT_COMMAND.to_string()),
            streaming: Some(true),
            base_branch: Some(DEFAULT_BASE_BRANCH.to_string()),
        }
    }

    pub fn effective_provider(&self) -> ProviderKind {
        self.provider.unwrap_or_default()
    }

    pub fn effective_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn effective_exit_command(&self) -> &str {
        self.exit_command.as_deref().unwrap_or(DEFAULT_EXIT_COMMAND)
    }

    pub fn effective_streaming(&self) -> bool {
        self.streaming.unwrap_or(true)
    }

    pub fn effective_base_branch(&self) -> &str {
        self.base_branch.as_deref().unwrap_or(DEFAULT_BASE_BRANCH)
    }

    /// Merge another settings into this one, only updating fields that are Some.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(provider) = other.provider {
            self.provider = provider;
        }
        if let Some(ref program) = other.provider_program {
            self.provider_program.clone_from(program);
        }
        if let Some(ref model) = other.model {
            self.model.clone_from(model);
        }
        if let Some(timeout) = other.timeout_secs {
            self.timeout_secs = timeout;
        }
        if let Some(ref command) = other.exit_command {
            self.exit_command.clone_from(command);
        }
        if let Some(streaming) = other.streaming {
            self.streaming = streaming;
        }
        if let Some(ref branch) = other.base_branch {
            self.base_branch.clone_from(branch);
        }
    }

    /// Fill unset fields from `fallback`.
    #[must_use]
    pub fn or(self, fallback: &Self) -> Self {
        Self {
            provider: self.provider.or(fallback.provider),
            provider_program: self.provider_program.or_else(|| fallback.provider_program.clone()),
            model: self.model.or_else(|| fallback.model.clone()),
            timeout_secs: self.timeout_secs.or(fallback.timeout_secs),
            exit_command: self.exit_command.or_else(|| fallback.exit_command.clone()),
            streaming: self.streaming.or(fallback.streaming),
            base_branch: self.base_branch.or_else(|| fallback.base_branch.clone()),
        }
    }
}

/// Partial settings update.
///
/// Each field is `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = set field to None/null
/// - `Some(Some(value))` = set field to value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub provider: Option<Option<ProviderKind>>,
    pub provider_program: Option<Option<String>>,
    pub model: Option<Option<String>>,
    pub timeout_secs: Option<Option<u64>>,
    pub exit_command: Option<Option<String>>,
    pub streaming: Option<Option<bool>>,
    pub base_branch: Option<Option<String>>,
}

impl SettingsUpdate {
    /// Build an update from a `key value` pair as typed on the command line.
    ///
    /// The values `none`, `null` and the empty string clear the field.
    pub fn from_key_value(key: &str, value: &str) -> Result<Self, SettingsError> {
        let trimmed = value.trim();
        let cleared = trimmed.is_empty() || matches!(trimmed, "none" | "null");
        let text = || (!cleared).then(|| trimmed.to_string());

        let mut update = Self::default();
        match key {
            "provider" => {
                let provider = if cleared {
                    None
                } else {
                    Some(
                        trimmed
                            .parse::<ProviderKind>()
                            .map_err(|e| SettingsError::InvalidValue {
                                key: key.to_string(),
                                reason: e.to_string(),
                            })?,
                    )
                };
                update.provider = Some(provider);
            }
            "provider_program" => update.provider_program = Some(text()),
            "model" => update.model = Some(text()),
            "timeout_secs" => {
                let secs = if cleared {
                    None
                } else {
                    Some(
                        trimmed
                            .parse::<u64>()
                            .map_err(|e| SettingsError::InvalidValue {
                                key: key.to_string(),
                                reason: e.to_string(),
                            })?,
                    )
                };
                update.timeout_secs = Some(secs);
            }
            "exit_command" => update.exit_command = Some(text()),
            "streaming" => {
                let streaming = if cleared {
                    None
                } else {
                    Some(
                        trimmed
                            .parse::<bool>()
                            .map_err(|e| SettingsError::InvalidValue {
                                key: key.to_string(),
                                reason: e.to_string(),
                            })?,
                    )
                };
                update.streaming = Some(streaming);
            }
            "base_branch" => update.base_branch = Some(text()),
            other => return Err(SettingsError::UnknownKey(other.to_string())),
        }
        Ok(update)
    }
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Timeout must be between 1 and {MAX_TIMEOUT_SECS} seconds, got {0}")]
    InvalidTimeout(u64),

    #[error("Exit command cannot be blank")]
    BlankExitCommand,

    #[error("Base branch cannot be blank")]
    BlankBaseBranch,

    #[error("Provider program cannot be blank")]
    BlankProviderProgram,

    #[error("Unknown setting '{0}'")]
    UnknownKey(String),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Failed to access settings file {path}: {reason}")]
    Storage { path: String, reason: String },
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if let Some(secs) = settings.timeout_secs {
        if !(1..=MAX_TIMEOUT_SECS).contains(&secs) {
            return Err(SettingsError::InvalidTimeout(secs));
        }
    }

    if settings
        .exit_command
        .as_ref()
        .is_some_and(|c| c.trim().is_empty())
    {
        return Err(SettingsError::BlankExitCommand);
    }

    if settings
        .base_branch
        .as_ref()
        .is_some_and(|b| b.trim().is_empty())
    {
        return Err(SettingsError::BlankBaseBranch);
    }

    if settings
        .provider_program
        .as_ref()
        .is_some_and(|p| p.trim().is_empty())
    {
        return Err(SettingsError::BlankProviderProgram);
    }

    Ok(())
}

/// Read settings from `path`. A missing file yields empty settings.
pub fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
    let storage_error = |reason: String| SettingsError::Storage {
        path: path.display().to_string(),
        reason,
    };

    if !path.exists() {
        return Ok(Settings::default());
    }

    let contents = fs::read_to_string(path).map_err(|e| storage_error(e.to_string()))?;
    if contents.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_json::from_str(&contents).map_err(|e| storage_error(e.to_string()))
}

/// Validate and write settings to `path`, creating parent directories.
pub fn save_settings(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    validate_settings(settings)?;

    let storage_error = |reason: String| SettingsError::Storage {
        path: path.display().to_string(),
        reason,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| storage_error(e.to_string()))?;
    }
    let json = serde_json::to_string_pretty(settings).map_err(|e| storage_error(e.to_string()))?;
    fs::write(path, json + "\n").map_err(|e| storage_error(e.to_string()))
}
