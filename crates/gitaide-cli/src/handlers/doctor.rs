//! Doctor command handler.
//!
//! Checks the external programs gitaide drives and shows where they live.

use anyhow::Result;
use gitaide_runtime::vcs::{GH_INSTALL_HINT, GIT_INSTALL_HINT};
use gitaide_runtime::{ToolProbe, ToolStatus};
use tracing::debug;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{print_separator, print_tool_row};

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// The tools to check for the configured assistant.
pub fn planned_probes(ctx: &CliContext) -> Vec<ToolProbe> {
    let provider = ctx.provider();
    vec![
        ToolProbe::required("git", "git").with_hint(GIT_INSTALL_HINT),
        ToolProbe::optional("gh", "gh").with_hint(GH_INSTALL_HINT),
        ToolProbe::required(provider.kind().as_str(), provider.program())
            .with_hint(provider.install_hint()),
    ]
}

/// Probe every tool, print the table and fail when a required one is missing.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    println!("{BOLD}Checking tools...{RESET}\n");

    let probes: Vec<ToolProbe> = planned_probes(ctx)
        .into_iter()
        .map(ToolProbe::check)
        .collect();

    println!("{BOLD} {:<10} {:<44} NOTES{RESET}", "TOOL", "STATUS");
    print_separator(80);
    for probe in &probes {
        print_tool_row(probe);
    }
    print_separator(80);

    if probes
        .iter()
        .any(|p| p.program == "gh" && matches!(p.status, ToolStatus::Present { .. }))
    {
        match ctx.vcs.gh_authenticated().await {
            Ok(true) => println!("{GREEN}✓ gh is logged in{RESET}"),
            Ok(false) => println!("{YELLOW}○ gh is not logged in (run: gh auth login){RESET}"),
            Err(e) => debug!(error = %e, "gh auth status failed"),
        }
    }

    let missing: Vec<&ToolProbe> = probes.iter().filter(|p| p.is_blocking()).collect();
    if missing.is_empty() {
        println!("{GREEN}✓ Ready to use {}{RESET}", ctx.provider().kind());
        return Ok(());
    }

    println!("{RED}✗ {} required tool(s) missing{RESET}", missing.len());
    for probe in &missing {
        println!("  {}: {}", probe.name, probe.hint);
    }
    let names: Vec<&str> = missing.iter().map(|p| p.name.as_str()).collect();
    Err(CliError::Launch(format!("Missing required tools: {}", names.join(", "))).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::{CliConfig, bootstrap};
    use gitaide_core::ProviderKind;

    #[test]
    fn probes_follow_the_configured_provider() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = bootstrap(&CliConfig {
            provider: Some(ProviderKind::Gemini),
            cwd: Some(dir.path().to_path_buf()),
            settings_path: Some(dir.path().join("settings.json")),
            ..Default::default()
        })
        .unwrap();

        let probes = planned_probes(&ctx);
        let names: Vec<&str> = probes.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["git", "gh", "gemini"]);
        assert!(probes[0].required);
        assert!(!probes[1].required);
        assert!(probes[2].required);
        assert!(probes[2].hint.contains("gemini"));
    }
}
