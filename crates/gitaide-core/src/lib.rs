#![doc = include_str!("../README.md")]

pub mod domain;
pub mod paths;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    AssistantPrompt, EscalationPolicy, Invocation, OutputChunk, ProviderKind, SessionOptions,
    SessionOutput, StreamKind, TerminationReason, TerminationReport, TerminationStage,
    UnknownProvider,
};
pub use ports::{AssistantProvider, CoreError, NoopSink, OutputSinkPort, SessionError};
pub use settings::{
    DEFAULT_BASE_BRANCH, DEFAULT_EXIT_COMMAND, DEFAULT_TIMEOUT_SECS, MAX_TIMEOUT_SECS, Settings,
    SettingsError, SettingsUpdate, load_settings, save_settings, validate_settings,
};

// Re-export path utilities
pub use paths::{PathError, config_root, env_file_path, resolve_working_dir, settings_path};
