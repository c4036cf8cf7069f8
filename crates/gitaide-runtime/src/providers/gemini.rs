//! Google `gemini` CLI.

use std::path::Path;

use gitaide_core::{AssistantPrompt, AssistantProvider, Invocation, ProviderKind};

pub const DEFAULT_PROGRAM: &str = "gemini";

const INSTALL_HINT: &str = "Install Gemini CLI with: npm install -g @google/gemini-cli";

/// Runs `gemini -p <prompt>`; allowed tools map to `--yolo`.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    program: String,
}

impl GeminiProvider {
    pub fn new(program: Option<String>) -> Self {
        Self {
            program: program.unwrap_or_else(|| DEFAULT_PROGRAM.to_string()),
        }
    }
}

impl AssistantProvider for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn program(&self) -> &str {
        &self.program
    }

    fn install_hint(&self) -> &str {
        INSTALL_HINT
    }

    fn invocation(&self, prompt: &AssistantPrompt, working_dir: &Path) -> Invocation {
        let mut inv =
            Invocation::new(&self.program, working_dir).with_install_hint(INSTALL_HINT);

        if let Some(ref model) = prompt.model {
            inv = inv.args(["-m", model.as_str()]);
        }
        if !prompt.allowed_tools.is_empty() {
            inv = inv.arg("--yolo");
        }
        inv.args(["-p", prompt.text.as_str()])
    }
}
