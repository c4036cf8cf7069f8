//! Standup command handler.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;

use super::{Mode, run_assistant};
use crate::bootstrap::CliContext;
use crate::presentation::{StandupReport, write_report};
use crate::prompts::standup_prompt;

/// Arguments for `gitaide standup`.
#[derive(Debug, Clone)]
pub struct StandupArgs {
    pub since: String,
    pub author: Option<String>,
    pub output: Option<PathBuf>,
}

/// Summarize recent commits into a markdown standup report.
pub async fn execute(ctx: &CliContext, args: StandupArgs) -> Result<()> {
    let log = ctx
        .vcs
        .log_since(&args.since, args.author.as_deref())
        .await
        .context("Failed to read the commit log")?;

    let body = if log.trim().is_empty() {
        String::new()
    } else {
        let prompt = ctx.prompt(standup_prompt(&log, &args.since, args.author.as_deref()));
        run_assistant(ctx, &prompt, Mode::Collect, false).await?
    };

    let project = ctx
        .vcs
        .repo_root()
        .await
        .ok()
        .as_ref()
        .and_then(|root| root.file_name())
        .map_or_else(|| "repository".to_string(), |n| n.to_string_lossy().into_owned());

    let report = StandupReport {
        project,
        date: Local::now().date_naive(),
        since: args.since,
        author: args.author,
        body,
    }
    .render();

    match args.output {
        Some(path) => {
            let path = if path.is_absolute() {
                path
            } else {
                ctx.working_dir().join(path)
            };
            write_report(&path, &report)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✓ Standup report written to {}", path.display());
        }
        None => print!("{report}"),
    }
    Ok(())
}
