//! Table formatting utilities for CLI output.

use gitaide_runtime::{ToolProbe, ToolStatus};

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Truncates a string to at most `max_chars` characters, adding "..." if needed.
///
/// # Examples
///
/// ```rust
/// use gitaide_cli::presentation::truncate_string;
///
/// assert_eq!(truncate_string("Hello", 10), "Hello");
/// assert_eq!(truncate_string("Hello World", 8), "Hello...");
/// ```
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Print a horizontal separator line.
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

/// Format an optional value for table display, returning a default if None.
pub fn format_optional<T: std::fmt::Display>(value: Option<&T>, default: &str) -> String {
    value.map_or_else(|| default.to_string(), ToString::to_string)
}

/// Status cell for one probed tool, without color.
pub fn tool_status_text(probe: &ToolProbe) -> String {
    match &probe.status {
        ToolStatus::Present {
            version: Some(version),
            ..
        } => format!("✓ {}", truncate_string(version, 40)),
        ToolStatus::Present { version: None, .. } => "✓ installed".to_string(),
        ToolStatus::Missing if probe.required => "✗ missing".to_string(),
        ToolStatus::Missing => "○ missing".to_string(),
    }
}

/// Print a single row of the `doctor` table.
pub fn print_tool_row(probe: &ToolProbe) {
    let color = match (&probe.status, probe.required) {
        (ToolStatus::Present { .. }, _) => GREEN,
        (ToolStatus::Missing, true) => RED,
        (ToolStatus::Missing, false) => YELLOW,
    };
    let marker = if probe.required {
        format!("{RED}*{RESET}")
    } else {
        " ".to_string()
    };
    let location = match &probe.status {
        ToolStatus::Present { path, .. } => path.display().to_string(),
        ToolStatus::Missing => probe.hint.clone(),
    };

    println!(
        "{marker}{:<10} {color}{:<44}{RESET} {location}",
        probe.name,
        tool_status_text(probe)
    );
}
