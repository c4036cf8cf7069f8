//! OpenAI `codex` CLI.

use std::path::Path;

use gitaide_core::{AssistantPrompt, AssistantProvider, Invocation, ProviderKind};

pub const DEFAULT_PROGRAM: &str = "codex";

const INSTALL_HINT: &str = "Install Codex CLI with: npm install -g @openai/codex";

/// Runs `codex exec <prompt>`.
///
/// Codex has no per-tool allow-list; any allowed tool switches on
/// `--full-auto` so the agent may run commands without asking.
#[derive(Debug, Clone)]
pub struct CodexProvider {
    program: String,
}

impl CodexProvider {
    pub fn new(program: Option<String>) -> Self {
        Self {
            program: program.unwrap_or_else(|| DEFAULT_PROGRAM.to_string()),
        }
    }
}

impl AssistantProvider for CodexProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Codex
    }

    fn program(&self) -> &str {
        &self.program
    }

    fn install_hint(&self) -> &str {
        INSTALL_HINT
    }

    fn invocation(&self, prompt: &AssistantPrompt, working_dir: &Path) -> Invocation {
        let mut inv = Invocation::new(&self.program, working_dir)
            .arg("exec")
            .with_install_hint(INSTALL_HINT);

        if let Some(ref model) = prompt.model {
            inv = inv.args(["--model", model.as_str()]);
        }
        if !prompt.allowed_tools.is_empty() {
            inv = inv.arg("--full-auto");
        }
        inv.arg(prompt.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_is_last_argument() {
        let prompt = AssistantPrompt::new("open a PR").allow_tool("Bash(gh pr create:*)");
        let inv = CodexProvider::new(None).invocation(&prompt, Path::new("/repo"));

        assert_eq!(inv.program, "codex");
        assert_eq!(inv.args, vec!["exec", "--full-auto", "open a PR"]);
    }

    #[test]
    fn read_only_prompt_stays_supervised() {
        let prompt = AssistantPrompt::new("review").with_model(Some("o4-mini".into()));
        let inv = CodexProvider::new(None).invocation(&prompt, Path::new("/repo"));

        assert_eq!(inv.args, vec!["exec", "--model", "o4-mini", "review"]);
    }
}
