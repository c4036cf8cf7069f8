//! Anthropic `claude` CLI.

use std::path::Path;

use gitaide_core::{AssistantPrompt, AssistantProvider, Invocation, ProviderKind};

pub const DEFAULT_PROGRAM: &str = "claude";

const INSTALL_HINT: &str = "Install Claude Code with: npm install -g @anthropic-ai/claude-code";

/// Runs `claude -p <prompt>` in print mode.
#[derive(Debug, Clone)]
pub struct ClaudeProvider {
    program: String,
}

impl ClaudeProvider {
    pub fn new(program: Option<String>) -> Self {
        Self {
            program: program.unwrap_or_else(|| DEFAULT_PROGRAM.to_string()),
        }
    }
}

impl Default for ClaudeProvider {
    fn default() -> Self {
        Self::new(None)
    }
}

impl AssistantProvider for ClaudeProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Claude
    }

    fn program(&self) -> &str {
        &self.program
    }

    fn install_hint(&self) -> &str {
        INSTALL_HINT
    }

    fn invocation(&self, prompt: &AssistantPrompt, working_dir: &Path) -> Invocation {
        let mut inv = Invocation::new(&self.program, working_dir)
            .args(["-p", prompt.text.as_str(), "--output-format", "text"])
            .with_install_hint(INSTALL_HINT);

        if let Some(ref model) = prompt.model {
            inv = inv.args(["--model", model.as_str()]);
        }
        if !prompt.allowed_tools.is_empty() {
            inv = inv.arg("--allowedTools").arg(prompt.allowed_tools.join(","));
        }
        inv
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_print_mode_invocation() {
        let prompt = AssistantPrompt::new("summarise")
            .allow_tool("Bash(git log:*)")
            .allow_tool("Read")
            .with_model(Some("opus".into()));

        let inv = ClaudeProvider::default().invocation(&prompt, Path::new("/repo"));

        assert_eq!(inv.program, "claude");
        assert_eq!(
            inv.args,
            vec![
                "-p",
                "summarise",
                "--output-format",
                "text",
                "--model",
                "opus",
                "--allowedTools",
                "Bash(git log:*),Read",
            ]
        );
        assert!(inv.install_hint.unwrap().contains("claude-code"));
    }

    #[test]
    fn program_override_is_used() {
        let provider = ClaudeProvider::new(Some("/opt/bin/claude".into()));
        let inv = provider.invocation(&AssistantPrompt::new("hi"), Path::new("."));
        assert_eq!(inv.program, "/opt/bin/claude");
        assert_eq!(inv.args, vec!["-p", "hi", "--output-format", "text"]);
    }
}
