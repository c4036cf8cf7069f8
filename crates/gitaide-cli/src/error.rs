//! CLI-specific error types and mappings.
//!
//! Handlers return `anyhow::Result`; the entry point classifies the error
//! chain into a [`CliError`] to pick the exit code.

use gitaide_core::{CoreError, PathError, SessionError, SettingsError};
use thiserror::Error;

use crate::changelog::ChangelogError;

/// CLI-specific error type.
#[derive(Debug, Clone, Error)]
pub enum CliError {
    /// Argument or input validation error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// A required external program is missing or cannot be started.
    #[error("{0}")]
    Launch(String),

    /// An external program failed, or any other runtime failure.
    #[error("{0}")]
    Process(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The assistant was stopped by the timeout.
    #[error("{0}")]
    Timeout(String),

    /// The user cancelled.
    #[error("{0}")]
    Interrupted(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// - 1: general failure, including non-zero exits of external programs
    /// - 2: invalid arguments
    /// - 69: required program unavailable (`EX_UNAVAILABLE`)
    /// - 74: I/O error (`EX_IOERR`)
    /// - 78: configuration error (`EX_CONFIG`)
    /// - 124: timeout, as reported by `timeout(1)`
    /// - 130: interrupted, 128 + SIGINT
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Process(_) => 1,
            Self::Arguments(_) => 2,
            Self::Launch(_) => 69,
            Self::Io(_) => 74,
            Self::Config(_) => 78,
            Self::Timeout(_) => 124,
            Self::Interrupted(_) => 130,
        }
    }

    /// Classify a handler error by the first recognised cause in its chain.
    ///
    /// The message keeps the full context chain.
    pub fn classify(err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");
        for cause in err.chain() {
            if let Some(e) = cause.downcast_ref::<Self>() {
                return e.clone();
            }
            if let Some(e) = cause.downcast_ref::<SessionError>() {
                return Self::from_session(e, message);
            }
            if let Some(e) = cause.downcast_ref::<CoreError>() {
                return Self::from_core(e, message);
            }
            if cause.is::<SettingsError>() || cause.is::<PathError>() {
                return Self::Config(message);
            }
            if cause.is::<ChangelogError>() {
                return Self::Arguments(message);
            }
            if cause.is::<std::io::Error>() {
                return Self::Io(message);
            }
        }
        Self::Process(message)
    }

    fn from_session(err: &SessionError, message: String) -> Self {
        match err {
            SessionError::Launch { .. } | SessionError::Spawn { .. } => Self::Launch(message),
            SessionError::Timeout { .. } => Self::Timeout(message),
            SessionError::Interrupted { .. } => Self::Interrupted(message),
            SessionError::Process { .. } => Self::Process(message),
            SessionError::Io { .. } => Self::Io(message),
        }
    }

    fn from_core(err: &CoreError, message: String) -> Self {
        match err {
            CoreError::Session(e) => Self::from_session(e, message),
            CoreError::Settings(_) | CoreError::Path(_) | CoreError::Configuration(_) => {
                Self::Config(message)
            }
            CoreError::Validation(_) => Self::Arguments(message),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        Self::from_core(&err, message)
    }
}

impl From<SessionError> for CliError {
    fn from(err: SessionError) -> Self {
        let message = err.to_string();
        Self::from_session(&err, message)
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
