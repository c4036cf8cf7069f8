//! Markdown standup report.

use std::fs;
use std::io;
use std::path::Path;

use chrono::NaiveDate;

/// A standup summary wrapped with its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandupReport {
    pub project: String,
    pub date: NaiveDate,
    pub since: String,
    pub author: Option<String>,
    pub body: String,
}

impl StandupReport {
    /// Render as a markdown document ending in a newline.
    pub fn render(&self) -> String {
        let mut out = format!("# Standup: {}\n\n", self.project);
        out.push_str(&format!("**Date:** {}  \n", self.date.format("%Y-%m-%d")));
        out.push_str(&format!("**Period:** since {}", self.since));
        if let Some(author) = &self.author {
            out.push_str(&format!("  \n**Author:** {author}"));
        }
        out.push_str("\n\n");

        let body = self.body.trim();
        if body.is_empty() {
            out.push_str("_No activity in this period._\n");
        } else {
            out.push_str(body);
            out.push('\n');
        }
        out
    }
}

/// Write `contents` to `path`, creating parent directories.
pub fn write_report(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(author: Option<&str>, body: &str) -> StandupReport {
        StandupReport {
            project: "widget".into(),
            date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            since: "yesterday".into(),
            author: author.map(str::to_string),
            body: body.into(),
        }
    }

    #[test]
    fn renders_header_and_body() {
        let text = report(Some("ada"), "\n**Done**\n- Shipped it\n\n").render();
        assert_eq!(
            text,
            "# Standup: widget\n\n\
             **Date:** 2026-10-16  \n\
             **Period:** since yesterday  \n\
             **Author:** ada\n\n\
             **Done**\n- Shipped it\n"
        );
    }

    #[test]
    fn empty_body_gets_placeholder() {
        let text = report(None, "  ").render();
        assert!(!text.contains("Author"));
        assert!(text.ends_with("_No activity in this period._\n"));
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports/2026/standup.md");
        write_report(&path, "# hi\n").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "# hi\n");
    }
}
