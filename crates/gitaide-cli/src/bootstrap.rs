//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where the CLI is wired together:
//! - Settings layering (file, then `GITAIDE_*` environment, then flags)
//! - Working directory resolution
//! - Assistant provider selection and the `AssistantRunner`
//! - `git`/`gh` helpers and the interrupt token shared by every session

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use gitaide_core::{
    AssistantPrompt, AssistantProvider, ProviderKind, SessionOptions, Settings, SettingsError,
    SettingsUpdate, load_settings, resolve_working_dir, settings_path, validate_settings,
};
use gitaide_runtime::{AssistantRunner, ConsoleSink, Vcs, provider_from_settings};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::parser::Cli;

/// Per-invocation overrides taken from the command line.
///
/// Environment variables are already folded in by clap.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub provider: Option<ProviderKind>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
    pub no_stream: bool,
    pub exit_command: Option<String>,
    pub cwd: Option<PathBuf>,
    /// Settings file to read. `None` uses the default location.
    pub settings_path: Option<PathBuf>,
}

impl CliConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            provider: cli.provider,
            model: cli.model.clone(),
            timeout_secs: cli.timeout,
            no_stream: cli.no_stream,
            exit_command: cli.exit_command.clone(),
            cwd: cli.cwd.clone(),
            settings_path: None,
        }
    }

    /// The overrides as a settings update. Unset flags leave settings alone.
    pub fn as_update(&self) -> SettingsUpdate {
        SettingsUpdate {
            provider: self.provider.map(Some),
            model: self.model.clone().map(Some),
            timeout_secs: self.timeout_secs.map(Some),
            exit_command: self.exit_command.clone().map(Some),
            streaming: self.no_stream.then_some(Some(false)),
            ..Default::default()
        }
    }
}

/// Apply defaults and overrides to the stored settings, then validate.
pub fn layer_settings(
    stored: Settings,
    overrides: &SettingsUpdate,
) -> Result<Settings, SettingsError> {
    let mut settings = stored.or(&Settings::with_defaults());
    settings.merge(overrides);
    validate_settings(&settings)?;
    Ok(settings)
}

/// Session options for assistant runs.
pub fn session_options(settings: &Settings) -> SessionOptions {
    SessionOptions::default()
        .with_streaming(settings.effective_streaming())
        .with_exit_command(Some(settings.effective_exit_command().to_string()))
        .with_timeout(Some(settings.effective_timeout()))
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    /// Effective settings for this invocation.
    pub settings: Settings,
    /// Where settings are persisted.
    pub settings_path: PathBuf,
    /// Directory every external program runs in.
    pub working_dir: PathBuf,
    /// Runs prompts through the configured assistant.
    pub runner: AssistantRunner,
    /// `git`/`gh` helpers bound to `working_dir`.
    pub vcs: Vcs,
    /// Cancelled on Ctrl-C; every session listens to it.
    pub cancel: CancellationToken,
}

impl CliContext {
    pub fn provider(&self) -> &Arc<dyn AssistantProvider> {
        self.runner.provider()
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// A prompt carrying the configured model.
    pub fn prompt(&self, text: impl Into<String>) -> AssistantPrompt {
        AssistantPrompt::new(text).with_model(self.settings.model.clone())
    }

    pub const fn streaming(&self) -> bool {
        self.runner.options().streaming
    }
}

/// Bootstrap the CLI application.
///
/// Loads and layers settings, resolves the working directory and assembles
/// the runner. No process is started here.
pub fn bootstrap(config: &CliConfig) -> Result<CliContext> {
    let settings_path = match &config.settings_path {
        Some(path) => path.clone(),
        None => settings_path().context("Failed to locate the settings file")?,
    };
    let stored = load_settings(&settings_path)?;
    let settings = layer_settings(stored, &config.as_update())?;
    debug!(?settings, path = %settings_path.display(), "settings resolved");

    let working_dir = resolve_working_dir(config.cwd.clone())?;
    let cancel = CancellationToken::new();

    let provider = provider_from_settings(&settings);
    let runner = AssistantRunner::new(provider, session_options(&settings))
        .with_sink(Arc::new(ConsoleSink));
    let vcs = Vcs::new(&working_dir).with_cancellation(cancel.clone());

    Ok(CliContext {
        settings,
        settings_path,
        working_dir,
        runner,
        vcs,
        cancel,
    })
}

/// Cancel `token` on Ctrl-C. Must be called inside the tokio runtime.
///
/// Children run in their own process group, so the terminal's SIGINT only
/// reaches gitaide; the session then stops the child through its escalation.
pub fn watch_interrupts(token: CancellationToken) {
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "cannot listen for Ctrl-C");
                return;
            }
            if token.is_cancelled() {
                eprintln!("\nStill stopping, please wait...");
            } else {
                eprintln!("\nStopping...");
                token.cancel();
            }
        }
    });
}
