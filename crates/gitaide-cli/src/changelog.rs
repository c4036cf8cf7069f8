//! `CHANGELOG.md` editing for `gitaide release`.
//!
//! Follows the Keep a Changelog layout: an `## [Unreleased]` section on top,
//! one `## [x.y.z] - YYYY-MM-DD` section per release and optional compare
//! links at the bottom.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

pub const CHANGELOG_FILE: &str = "CHANGELOG.md";

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v?(\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?)$")
        .expect("version pattern is valid")
});

static UNRELEASED_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^##\s*\[unreleased\]\s*$").expect("heading pattern is valid")
});

static LINK_DEFINITION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[[^\]]+\]:\s").expect("link pattern is valid"));

static UNRELEASED_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\[unreleased\]:\s*(\S+)/compare/(\S+)\.\.\.HEAD\s*$")
        .expect("compare link pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChangelogError {
    #[error("'{0}' is not a valid version (expected MAJOR.MINOR.PATCH, optionally prefixed with v)")]
    InvalidVersion(String),

    #[error("'{0}' is not a valid date (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("{CHANGELOG_FILE} has no '## [Unreleased]' section")]
    MissingUnreleased,

    #[error("The Unreleased section of {CHANGELOG_FILE} is empty; nothing to release")]
    EmptyUnreleased,

    #[error("{CHANGELOG_FILE} already has a section for {0}")]
    VersionExists(String),
}

/// A validated release version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseVersion {
    number: String,
}

impl ReleaseVersion {
    /// Accepts `1.2.3`, `v1.2.3` and pre-release/build suffixes.
    pub fn parse(input: &str) -> Result<Self, ChangelogError> {
        let trimmed = input.trim();
        VERSION_RE
            .captures(trimmed)
            .and_then(|c| c.get(1))
            .map(|m| Self {
                number: m.as_str().to_string(),
            })
            .ok_or_else(|| ChangelogError::InvalidVersion(input.to_string()))
    }

    /// The version without a `v` prefix, as used in changelog headings.
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Git tag name.
    pub fn tag(&self) -> String {
        format!("v{}", self.number)
    }
}

/// Parse `--date`, falling back to `today`.
pub fn release_date(input: Option<&str>, today: NaiveDate) -> Result<NaiveDate, ChangelogError> {
    match input {
        None => Ok(today),
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| ChangelogError::InvalidDate(raw.to_string())),
    }
}

/// Result of promoting the Unreleased section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Promotion {
    /// The rewritten changelog.
    pub contents: String,
    /// The released section's body, trimmed. Used as release notes.
    pub notes: String,
}

/// Turn `## [Unreleased]` into `## [<version>] - <date>` and open a fresh,
/// empty Unreleased section above it. Compare links are updated when present.
pub fn promote_unreleased(
    contents: &str,
    version: &ReleaseVersion,
    date: NaiveDate,
) -> Result<Promotion, ChangelogError> {
    let lines: Vec<&str> = contents.lines().collect();

    let heading = lines
        .iter()
        .position(|l| UNRELEASED_HEADING_RE.is_match(l.trim_end()))
        .ok_or(ChangelogError::MissingUnreleased)?;

    let existing = format!("## [{}]", version.number());
    if lines.iter().any(|l| l.starts_with(&existing)) {
        return Err(ChangelogError::VersionExists(version.number().to_string()));
    }

    let body_end = lines[heading + 1..]
        .iter()
        .position(|l| l.starts_with("## ") || LINK_DEFINITION_RE.is_match(l))
        .map_or(lines.len(), |offset| heading + 1 + offset);
    let body = &lines[heading + 1..body_end];

    let notes = body.join("\n").trim().to_string();
    if notes.is_empty() {
        return Err(ChangelogError::EmptyUnreleased);
    }

    let released_heading = format!(
        "## [{}] - {}",
        version.number(),
        date.format("%Y-%m-%d")
    );

    let mut out: Vec<String> = Vec::with_capacity(lines.len() + 4);
    out.extend(lines[..heading].iter().map(|l| (*l).to_string()));
    out.push(lines[heading].to_string());
    out.push(String::new());
    out.push(released_heading);
    out.extend(body.iter().map(|l| (*l).to_string()));

    for line in &lines[body_end..] {
        match UNRELEASED_LINK_RE.captures(line) {
            Some(caps) => {
                let base = &caps[1];
                let previous = &caps[2];
                let tag = version.tag();
                out.push(format!("[Unreleased]: {base}/compare/{tag}...HEAD"));
                out.push(format!(
                    "[{}]: {base}/compare/{previous}...{tag}",
                    version.number()
                ));
            }
            None => out.push((*line).to_string()),
        }
    }

    let mut contents = out.join("\n");
    contents.push('\n');
    Ok(Promotion { contents, notes })
}
