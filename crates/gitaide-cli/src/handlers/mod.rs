//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that:
//!   1. Gather input from git/gh helpers or the filesystem
//!   2. Build a prompt with [`crate::prompts`]
//!   3. Run it through the context's `AssistantRunner`
//!
//! Handlers should NOT spawn processes themselves.

pub mod ask;
pub mod config;
pub mod doctor;
pub mod pr;
pub mod release;
pub mod review;
pub mod standup;

use std::io::{self, BufReader, IsTerminal};

use anyhow::Result;
use gitaide_core::AssistantPrompt;
use gitaide_runtime::GenerateControls;
use gitaide_runtime::process::InteractiveInput;

use crate::bootstrap::CliContext;

/// How a handler wants the assistant run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Output is shown to the user as it arrives (or at the end with
    /// `--no-stream`).
    Show,
    /// Output is only returned to the handler.
    Collect,
}

/// Run `prompt` with the context's cancellation token.
///
/// With `interactive`, terminal input is watched for the exit command, which
/// ends the session. Other lines reach the assistant only if its provider
/// reads stdin.
pub async fn run_assistant(
    ctx: &CliContext,
    prompt: &AssistantPrompt,
    mode: Mode,
    interactive: bool,
) -> Result<String> {
    let controls = GenerateControls {
        cancel: Some(ctx.cancel.clone()),
        input: interactive.then(terminal_input).flatten(),
    };

    let runner = match mode {
        Mode::Show => ctx.runner.clone(),
        Mode::Collect => ctx
            .runner
            .clone()
            .with_sink(std::sync::Arc::new(gitaide_core::NoopSink)),
    };

    let result = runner
        .generate_with(prompt, ctx.working_dir(), controls)
        .await;

    let show_at_end = mode == Mode::Show && !ctx.streaming();
    match result {
        Ok(output) => {
            if show_at_end {
                print!("{output}");
            }
            Ok(output)
        }
        Err(err) => {
            if show_at_end {
                if let Some(partial) = err.partial_output().filter(|p| !p.is_empty()) {
                    print!("{partial}");
                }
            }
            Err(err.into())
        }
    }
}

/// Stdin as interactive input, when it is a terminal.
fn terminal_input() -> Option<InteractiveInput> {
    let stdin = io::stdin();
    stdin
        .is_terminal()
        .then(|| Box::new(BufReader::new(stdin)) as InteractiveInput)
}
