//! Release command handler.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::info;

use super::{Mode, run_assistant};
use crate::bootstrap::CliContext;
use crate::changelog::{
    CHANGELOG_FILE, Promotion, ReleaseVersion, promote_unreleased, release_date,
};
use crate::prompts::{RELEASE_TOOLS, release_prompt};

/// Arguments for `gitaide release`.
#[derive(Debug, Clone)]
pub struct ReleaseArgs {
    pub version: String,
    pub date: Option<String>,
    pub no_assistant: bool,
}

/// Promote the Unreleased changelog section, then have the assistant tag and
/// publish the release.
pub async fn execute(ctx: &CliContext, args: ReleaseArgs) -> Result<()> {
    let version = ReleaseVersion::parse(&args.version)?;
    let date = release_date(args.date.as_deref(), Local::now().date_naive())?;

    let root = ctx
        .vcs
        .repo_root()
        .await
        .context("Failed to locate the repository root")?;
    let changelog = root.join(CHANGELOG_FILE);
    let promotion = update_changelog(&changelog, &version, date)?;
    println!(
        "✓ {} updated: {} released on {}",
        CHANGELOG_FILE,
        version.number(),
        date.format("%Y-%m-%d")
    );

    if args.no_assistant {
        println!("Commit the changelog and push tag {} when ready.", version.tag());
        return Ok(());
    }

    let prompt = RELEASE_TOOLS.iter().fold(
        ctx.prompt(release_prompt(&version.tag(), &promotion.notes, CHANGELOG_FILE)),
        |p, tool| p.allow_tool(*tool),
    );
    run_assistant(ctx, &prompt, Mode::Show, false).await?;
    Ok(())
}

/// Rewrite the changelog at `path` in place.
pub fn update_changelog(
    path: &Path,
    version: &ReleaseVersion,
    date: chrono::NaiveDate,
) -> Result<Promotion> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let promotion = promote_unreleased(&contents, version, date)?;
    fs::write(path, &promotion.contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), version = version.number(), "changelog promoted");
    Ok(promotion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changelog::ChangelogError;
    use chrono::NaiveDate;

    #[test]
    fn update_changelog_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CHANGELOG_FILE);
        fs::write(&path, "# Changelog\n\n## [Unreleased]\n- New thing\n").unwrap();

        let version = ReleaseVersion::parse("1.0.0").unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let promotion = update_changelog(&path, &version, date).unwrap();

        assert_eq!(promotion.notes, "- New thing");
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "# Changelog\n\n## [Unreleased]\n\n## [1.0.0] - 2026-10-16\n- New thing\n"
        );
    }

    #[test]
    fn update_changelog_leaves_file_untouched_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CHANGELOG_FILE);
        fs::write(&path, "# Changelog\n").unwrap();

        let version = ReleaseVersion::parse("1.0.0").unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let err = update_changelog(&path, &version, date).unwrap_err();

        assert_eq!(
            err.downcast_ref::<ChangelogError>(),
            Some(&ChangelogError::MissingUnreleased)
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "# Changelog\n");
    }

    #[test]
    fn missing_changelog_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let version = ReleaseVersion::parse("1.0.0").unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let err = update_changelog(&dir.path().join(CHANGELOG_FILE), &version, date).unwrap_err();
        assert!(err.chain().any(|c| c.is::<std::io::Error>()));
    }
}
