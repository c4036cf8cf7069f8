//! Assistant provider strategy.
//!
//! Choosing which assistant CLI to run is an explicit object handed to the
//! runner, never process-wide state. Implementations only translate a prompt
//! into an [`Invocation`]; launching is the runtime's job.

use std::path::Path;

use crate::domain::{AssistantPrompt, Invocation, ProviderKind};

/// Strategy for invoking one assistant CLI.
///
/// # Design Rules
///
/// - Pure translation: no I/O, no process spawning
/// - The returned invocation carries the provider's install hint
pub trait AssistantProvider: Send + Sync {
    /// Which provider this is.
    fn kind(&self) -> ProviderKind;

    /// Executable that will be launched.
    fn program(&self) -> &str;

    /// How to install the CLI, shown when it is missing.
    fn install_hint(&self) -> &str;

    /// Build the command line for a single non-interactive request.
    fn invocation(&self, prompt: &AssistantPrompt, working_dir: &Path) -> Invocation;

    /// Whether lines typed during an interactive session go to the CLI's
    /// stdin.
    ///
    /// Off by default: in print mode the assistant CLIs read piped stdin to
    /// EOF as extra prompt text, so an open pipe would stall them.
    fn reads_stdin(&self) -> bool {
        false
    }
}
