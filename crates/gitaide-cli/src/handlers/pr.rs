//! Pull request command handler.

use anyhow::{Context, Result, bail};
use gitaide_core::CoreError;

use super::{Mode, run_assistant};
use crate::bootstrap::CliContext;
use crate::prompts::{PR_TOOLS, pr_prompt};

/// Let the assistant describe the current branch and open a pull request.
pub async fn execute(ctx: &CliContext, base: Option<String>, draft: bool) -> Result<()> {
    let base = base.unwrap_or_else(|| ctx.settings.effective_base_branch().to_string());
    let branch = ctx
        .vcs
        .current_branch()
        .await
        .context("Failed to read the current branch")?;

    if branch == "HEAD" {
        bail!(CoreError::Validation(
            "HEAD is detached; check out a branch before opening a pull request".into()
        ));
    }
    if branch == base {
        bail!(CoreError::Validation(format!(
            "Already on '{base}'; switch to a feature branch or pass --base"
        )));
    }

    let authenticated = ctx
        .vcs
        .gh_authenticated()
        .await
        .context("Failed to check GitHub CLI authentication")?;
    if !authenticated {
        bail!(CoreError::Configuration(
            "The GitHub CLI is not logged in. Run: gh auth login".into()
        ));
    }

    let prompt = PR_TOOLS
        .iter()
        .fold(ctx.prompt(pr_prompt(&branch, &base, draft)), |p, tool| {
            p.allow_tool(*tool)
        });
    run_assistant(ctx, &prompt, Mode::Show, false).await?;
    Ok(())
}
