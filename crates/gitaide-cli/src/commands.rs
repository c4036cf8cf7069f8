//! Main commands enum and the config subcommands.

use std::path::PathBuf;

use clap::Subcommand;

/// Available gitaide commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask the assistant to review the current changes
    Review {
        /// Compare against this ref instead of the configured base branch
        #[arg(long)]
        base: Option<String>,
        /// Review only staged changes
        #[arg(long, conflicts_with = "base")]
        staged: bool,
        /// Extra instructions, e.g. "error handling" or "security"
        #[arg(long)]
        focus: Option<String>,
    },

    /// Let the assistant write and open a pull request with `gh`
    Pr {
        /// Branch the pull request targets
        #[arg(long)]
        base: Option<String>,
        /// Open the pull request as a draft
        #[arg(long)]
        draft: bool,
    },

    /// Cut a release: update CHANGELOG.md, then tag and publish
    Release {
        /// Version to release, e.g. 1.4.0 or v1.4.0
        version: String,
        /// Release date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Only update CHANGELOG.md
        #[arg(long)]
        no_assistant: bool,
    },

    /// Summarize recent commits as a standup report
    Standup {
        /// Any date `git log --since` understands
        #[arg(long, default_value = "yesterday")]
        since: String,
        /// Only commits by this author (name or email substring)
        #[arg(long)]
        author: Option<String>,
        /// Write the report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Send a prompt straight to the assistant
    Ask {
        /// Prompt text
        #[arg(required = true, trailing_var_arg = true)]
        prompt: Vec<String>,
    },

    /// Check that git, gh and the assistant CLI are installed
    Doctor,

    /// View or change gitaide settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Settings command variants.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective settings
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the settings file location
    Path,
    /// Persist one setting (use "none" to clear it)
    Set {
        /// provider, provider_program, model, timeout_secs, exit_command,
        /// streaming or base_branch
        key: String,
        value: String,
    },
}
