//! Review command handler.

use anyhow::{Context, Result};
use tracing::info;

use super::{Mode, run_assistant};
use crate::bootstrap::CliContext;
use crate::prompts::review_prompt;

/// Arguments for `gitaide review`.
#[derive(Debug, Clone, Default)]
pub struct ReviewArgs {
    pub base: Option<String>,
    pub staged: bool,
    pub focus: Option<String>,
}

/// Collect the diff and stream the assistant's review of it.
pub async fn execute(ctx: &CliContext, args: ReviewArgs) -> Result<()> {
    let (diff, target) = if args.staged {
        let diff = ctx
            .vcs
            .diff(None, true)
            .await
            .context("Failed to read staged changes")?;
        (diff, "staged changes".to_string())
    } else {
        let base = args
            .base
            .unwrap_or_else(|| ctx.settings.effective_base_branch().to_string());
        let diff = ctx
            .vcs
            .diff(Some(&base), false)
            .await
            .with_context(|| format!("Failed to diff against '{base}'"))?;
        (diff, format!("changes since `{base}`"))
    };

    if diff.trim().is_empty() {
        println!("No changes to review ({target}).");
        return Ok(());
    }

    info!(bytes = diff.len(), %target, "requesting review");
    let prompt = ctx.prompt(review_prompt(&diff, &target, args.focus.as_deref()));
    run_assistant(ctx, &prompt, Mode::Show, false).await?;
    Ok(())
}
