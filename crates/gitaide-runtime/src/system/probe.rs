//! Command existence and version extraction.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

/// What the probe found for one tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolStatus {
    /// Found on `PATH`; `version` is the first line of `--version`, if any.
    Present {
        path: PathBuf,
        version: Option<String>,
    },
    Missing,
}

/// One tool to check, and whether the CLI can work without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolProbe {
    pub name: String,
    pub program: String,
    pub required: bool,
    pub hint: String,
    pub status: ToolStatus,
}

impl ToolProbe {
    pub fn required(name: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            required: true,
            hint: String::new(),
            status: ToolStatus::Missing,
        }
    }

    pub fn optional(name: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::required(name, program)
        }
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    /// Run the probe and record the result.
    #[must_use]
    pub fn check(mut self) -> Self {
        self.status = probe_tool(&self.program);
        self
    }

    pub const fn is_present(&self) -> bool {
        matches!(self.status, ToolStatus::Present { .. })
    }

    /// Required and not found.
    pub const fn is_blocking(&self) -> bool {
        self.required && !self.is_present()
    }
}

/// Locate `program` and read its version.
pub fn probe_tool(program: &str) -> ToolStatus {
    let Ok(path) = which::which(program) else {
        debug!(program, "not found on PATH");
        return ToolStatus::Missing;
    };

    let version = Command::new(&path)
        .arg("--version")
        .stdin(Stdio::null())
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| {
            // Some tools print their version on stderr
            first_version_line(&String::from_utf8_lossy(&o.stdout))
                .or_else(|| first_version_line(&String::from_utf8_lossy(&o.stderr)))
        });

    debug!(program, path = %path.display(), ?version, "probed tool");
    ToolStatus::Present { path, version }
}

/// First non-empty line of `text`, trimmed.
pub fn first_version_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_line_skips_blank_lines() {
        assert_eq!(
            first_version_line("\n  git version 2.43.0  \nextra"),
            Some("git version 2.43.0".to_string())
        );
        assert_eq!(first_version_line("   \n"), None);
    }

    #[test]
    fn missing_tool_is_reported_missing() {
        let probe = ToolProbe::required("nope", "gitaide-definitely-not-installed").check();
        assert_eq!(probe.status, ToolStatus::Missing);
        assert!(probe.is_blocking());
    }

    #[test]
    fn optional_missing_tool_does_not_block() {
        let probe = ToolProbe::optional("nope", "gitaide-definitely-not-installed")
            .with_hint("install it")
            .check();
        assert!(!probe.is_present());
        assert!(!probe.is_blocking());
        assert_eq!(probe.hint, "install it");
    }

    #[cfg(unix)]
    #[test]
    fn present_tool_has_path() {
        match probe_tool("sh") {
            ToolStatus::Present { path, .. } => assert!(path.is_absolute()),
            ToolStatus::Missing => panic!("sh should be on PATH"),
        }
    }
}
