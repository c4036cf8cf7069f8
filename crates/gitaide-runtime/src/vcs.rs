//! `git` and `gh` helpers.
//!
//! Each helper runs one captured (non-streaming) session and returns trimmed
//! stdout. Failures are ordinary [`SessionError`]s, so a missing `gh` shows up
//! as `Launch` with the install hint below.

use std::path::{Path, PathBuf};

use gitaide_core::{Invocation, SessionError, SessionOptions};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::process::Session;

pub const GIT_INSTALL_HINT: &str = "Install git from https://git-scm.com/downloads";
pub const GH_INSTALL_HINT: &str = "Install the GitHub CLI from https://cli.github.com";

/// Runs `git`/`gh` in one working directory.
#[derive(Debug, Clone)]
pub struct Vcs {
    working_dir: PathBuf,
    options: SessionOptions,
    cancel: Option<CancellationToken>,
}

impl Vcs {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            options: SessionOptions::captured(),
            cancel: None,
        }
    }

    /// Let `token` interrupt any helper in flight.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Override the session options. Streaming is always forced off.
    #[must_use]
    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options.with_streaming(false);
        self
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Top-level directory of the enclosing repository.
    pub async fn repo_root(&self) -> Result<PathBuf, SessionError> {
        self.git(["rev-parse", "--show-toplevel"])
            .await
            .map(PathBuf::from)
    }

    /// Name of the checked-out branch; `HEAD` when detached.
    pub async fn current_branch(&self) -> Result<String, SessionError> {
        self.git(["rev-parse", "--abbrev-ref", "HEAD"]).await
    }

    /// Diff of the working tree: staged changes, or everything since the
    /// merge base with `base`.
    pub async fn diff(&self, base: Option<&str>, staged: bool) -> Result<String, SessionError> {
        let mut args = vec!["diff".to_string(), "--no-color".to_string()];
        if staged {
            args.push("--staged".into());
        }
        if let Some(base) = base {
            args.push(format!("{base}...HEAD"));
        }
        self.git(args).await
    }

    /// One-line log of commits since `since`, optionally filtered by author.
    pub async fn log_since(
        &self,
        since: &str,
        author: Option<&str>,
    ) -> Result<String, SessionError> {
        let mut args = vec![
            "log".to_string(),
            format!("--since={since}"),
            "--no-merges".to_string(),
            "--date=short".to_string(),
            "--pretty=format:%h %ad %an %s".to_string(),
        ];
        if let Some(author) = author {
            args.push(format!("--author={author}"));
        }
        self.git(args).await
    }

    /// Most recent tag reachable from `HEAD`, if any.
    pub async fn latest_tag(&self) -> Result<Option<String>, SessionError> {
        match self.git(["describe", "--tags", "--abbrev=0"]).await {
            Ok(tag) => Ok(Some(tag)),
            // `git describe` exits 128 when there are no tags yet
            Err(SessionError::Process { code: Some(128), .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Whether `gh` is logged in. A missing `gh` is still an error.
    pub async fn gh_authenticated(&self) -> Result<bool, SessionError> {
        match self.gh(["auth", "status"]).await {
            Ok(_) => Ok(true),
            Err(SessionError::Process { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn git<I, S>(&self, args: I) -> Result<String, SessionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let invocation = Invocation::new("git", &self.working_dir)
            .args(args)
            .with_install_hint(GIT_INSTALL_HINT);
        self.run(invocation).await
    }

    async fn gh<I, S>(&self, args: I) -> Result<String, SessionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let invocation = Invocation::new("gh", &self.working_dir)
            .args(args)
            .with_install_hint(GH_INSTALL_HINT);
        self.run(invocation).await
    }

    async fn run(&self, invocation: Invocation) -> Result<String, SessionError> {
        debug!(command = %invocation, "vcs helper");
        let mut session = Session::new(invocation, self.options.clone());
        if let Some(token) = &self.cancel {
            session = session.with_cancellation(token.clone());
        }
        let output = session.run().await?;
        Ok(output.stdout.trim().to_string())
    }
}
