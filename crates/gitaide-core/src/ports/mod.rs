//! Port definitions (trait abstractions) and the session error taxonomy.
//!
//! Ports define the interfaces that the core domain expects from
//! infrastructure. They contain no implementation details.

pub mod assistant;
pub mod output_sink;

use std::io;
use std::time::Duration;
use thiserror::Error;

use crate::domain::{TerminationReason, TerminationReport};
use crate::paths::PathError;
use crate::settings::SettingsError;

pub use assistant::AssistantProvider;
pub use output_sink::{NoopSink, OutputSinkPort};

/// Everything that can end a session other than a clean exit.
///
/// Cancellations (`Timeout`, `Interrupted`) are expected outcomes rather than
/// faults; use [`SessionError::is_cancellation`] to branch on them.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The executable does not exist on `PATH`.
    #[error("`{program}` was not found. {hint}")]
    Launch { program: String, hint: String },

    /// The executable exists but could not be started.
    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The timeout elapsed and the process was stopped.
    #[error("`{program}` timed out after {}s", .after.as_secs())]
    Timeout {
        program: String,
        after: Duration,
        output: String,
        report: TerminationReport,
    },

    /// The user cancelled (interrupt key or exit command).
    #[error("`{program}` was cancelled by {}", .report.reason)]
    Interrupted {
        program: String,
        output: String,
        report: TerminationReport,
    },

    /// The process exited unsuccessfully.
    #[error("`{program}` exited with {}: {stderr}", describe_code(.code))]
    Process {
        program: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// Communication with the process failed.
    #[error("I/O error while running `{program}`: {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
}

#[allow(clippy::ref_option)]
fn describe_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "no exit code (signal)".to_string(), |c| format!("code {c}"))
}

impl SessionError {
    /// True for timeout and user cancellation.
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Interrupted { .. })
    }

    /// Why the session was stopped, if it was.
    pub const fn termination_reason(&self) -> Option<TerminationReason> {
        match self {
            Self::Timeout { report, .. } | Self::Interrupted { report, .. } => Some(report.reason),
            _ => None,
        }
    }

    /// Output captured before the session ended.
    pub fn partial_output(&self) -> Option<&str> {
        match self {
            Self::Timeout { output, .. } | Self::Interrupted { output, .. } => Some(output),
            Self::Process { stdout, .. } => Some(stdout),
            _ => None,
        }
    }

    pub fn program(&self) -> &str {
        match self {
            Self::Launch { program, .. }
            | Self::Spawn { program, .. }
            | Self::Timeout { program, .. }
            | Self::Interrupted { program, .. }
            | Self::Process { program, .. }
            | Self::Io { program, .. } => program,
        }
    }
}

/// Core error type for semantic domain errors.
///
/// Adapters map this to their own error types (CLI exit codes).
#[derive(Debug, Error)]
pub enum CoreError {
    /// An external process session failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Settings validation error.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Path resolution error.
    #[error(transparent)]
    Path(#[from] PathError),

    /// Validation error (invalid input).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration file could not be read or written.
    #[error("Configuration error: {0}")]
    Configuration(String),
}
