//! Main CLI parser and top-level argument handling.
//!
//! Global options sit on top of the settings file: a flag beats its
//! `GITAIDE_*` environment variable, which beats `settings.json`.

use std::path::PathBuf;

use clap::Parser;
use gitaide_core::{MAX_TIMEOUT_SECS, ProviderKind};

use crate::commands::Commands;

/// Git workflow helpers driven by an AI coding assistant CLI.
#[derive(Parser, Debug)]
#[command(name = "gitaide")]
#[command(about = "Review, ship and summarize git work with an AI assistant CLI")]
#[command(version)]
pub struct Cli {
    /// Assistant CLI to drive (claude, codex, gemini)
    #[arg(long, global = true, env = "GITAIDE_PROVIDER")]
    pub provider: Option<ProviderKind>,

    /// Model name passed to the assistant
    #[arg(long, global = true, env = "GITAIDE_MODEL")]
    pub model: Option<String>,

    /// Stop the assistant after this many seconds
    #[arg(
        long,
        global = true,
        env = "GITAIDE_TIMEOUT",
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..=MAX_TIMEOUT_SECS)
    )]
    pub timeout: Option<u64>,

    /// Collect assistant output and print it at the end instead of streaming
    #[arg(long, global = true)]
    pub no_stream: bool,

    /// Line that ends an interactive session (default: /exit)
    #[arg(long, global = true, env = "GITAIDE_EXIT_COMMAND", value_name = "TEXT")]
    pub exit_command: Option<String>,

    /// Run as if started in this directory
    #[arg(short = 'C', long = "cwd", global = true, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
