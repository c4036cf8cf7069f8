//! Assistant provider implementations.
//!
//! Each provider is a strategy object implementing
//! [`AssistantProvider`]; [`provider_for`] picks one from settings.

mod claude;
mod codex;
mod gemini;

use std::sync::Arc;

use gitaide_core::{AssistantProvider, ProviderKind, Settings};

pub use claude::ClaudeProvider;
pub use codex::CodexProvider;
pub use gemini::GeminiProvider;

/// Build the provider for `kind`, honoring an optional program override.
pub fn provider_for(kind: ProviderKind, program: Option<String>) -> Arc<dyn AssistantProvider> {
    match kind {
        ProviderKind::Claude => Arc::new(ClaudeProvider::new(program)),
        ProviderKind::Codex => Arc::new(CodexProvider::new(program)),
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(program)),
    }
}

/// Build the provider selected by `settings`.
pub fn provider_from_settings(settings: &Settings) -> Arc<dyn AssistantProvider> {
    provider_for(
        settings.effective_provider(),
        settings.provider_program.clone(),
    )
}
