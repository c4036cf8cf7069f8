//! Assistant runner: one prompt, one session.

use std::path::Path;
use std::sync::Arc;

use gitaide_core::{
    AssistantPrompt, AssistantProvider, NoopSink, OutputSinkPort, SessionError, SessionOptions,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::process::{InteractiveInput, Session};

/// Runs prompts through an injected [`AssistantProvider`].
///
/// The provider is a constructor argument, so tests can substitute any
/// program without touching process-wide state.
#[derive(Clone)]
pub struct AssistantRunner {
    provider: Arc<dyn AssistantProvider>,
    options: SessionOptions,
    sink: Arc<dyn OutputSinkPort>,
}

/// Per-call extras for [`AssistantRunner::generate_with`].
#[derive(Default)]
pub struct GenerateControls {
    pub cancel: Option<CancellationToken>,
    pub input: Option<InteractiveInput>,
}

impl AssistantRunner {
    pub fn new(provider: Arc<dyn AssistantProvider>, options: SessionOptions) -> Self {
        Self {
            provider,
            options,
            sink: Arc::new(NoopSink),
        }
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn OutputSinkPort>) -> Self {
        self.sink = sink;
        self
    }

    pub fn provider(&self) -> &Arc<dyn AssistantProvider> {
        &self.provider
    }

    pub const fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Build the session for `prompt` without running it.
    pub fn session(&self, prompt: &AssistantPrompt, working_dir: &Path) -> Session {
        let invocation = self.provider.invocation(prompt, working_dir);
        Session::new(invocation, self.options.clone()).with_sink(Arc::clone(&self.sink))
    }

    /// Run `prompt` and return the assistant's full output.
    pub async fn generate(
        &self,
        prompt: &AssistantPrompt,
        working_dir: &Path,
    ) -> Result<String, SessionError> {
        self.generate_with(prompt, working_dir, GenerateControls::default())
            .await
    }

    /// Like [`generate`](Self::generate), with a cancellation token and/or
    /// interactive input attached to the session.
    pub async fn generate_with(
        &self,
        prompt: &AssistantPrompt,
        working_dir: &Path,
        controls: GenerateControls,
    ) -> Result<String, SessionError> {
        let mut session = self.session(prompt, working_dir);
        if let Some(token) = controls.cancel {
            session = session.with_cancellation(token);
        }
        if let Some(input) = controls.input {
            session = session.with_input(input);
            if self.provider.reads_stdin() {
                session = session.with_stdin_forwarding();
            }
        }

        info!(provider = %self.provider.kind(), "running assistant");
        let output = session.run().await?;
        Ok(output.stdout)
    }
}
