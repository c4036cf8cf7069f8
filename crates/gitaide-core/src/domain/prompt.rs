//! Assistant-facing request types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which assistant CLI to shell out to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Anthropic's `claude` CLI.
    #[default]
    Claude,
    /// OpenAI's `codex` CLI.
    Codex,
    /// Google's `gemini` CLI.
    Gemini,
}

impl ProviderKind {
    pub const ALL: [Self; 3] = [Self::Claude, Self::Codex, Self::Gemini];

    /// Stable lowercase identifier used in settings and on the command line.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::Codex => "codex",
            Self::Gemini => "gemini",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a provider name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown provider '{0}' (expected one of: claude, codex, gemini)")]
pub struct UnknownProvider(pub String);

impl FromStr for ProviderKind {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| UnknownProvider(s.to_string()))
    }
}

/// One request for the assistant.
///
/// `allowed_tools` uses the assistant's own tool-permission syntax, e.g.
/// `Bash(gh pr create:*)`. Providers that have no fine-grained permission
/// model map a non-empty list to their "allow edits/commands" switch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssistantPrompt {
    pub text: String,
    pub allowed_tools: Vec<String>,
    pub model: Option<String>,
}

impl AssistantPrompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn allow_tool(mut self, tool: impl Into<String>) -> Self {
        self.allowed_tools.push(tool.into());
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }
}
