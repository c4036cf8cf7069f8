//! Description of one external command to run.

use std::fmt;
use std::path::{Path, PathBuf};

/// A fully-resolved external command: program, arguments and working directory.
///
/// An `Invocation` knows nothing about what the program does. Assistant
/// providers, `git` and `gh` helpers all produce one and hand it to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name (looked up on `PATH`) or path to the executable.
    pub program: String,
    /// Arguments passed verbatim, without shell interpretation.
    pub args: Vec<String>,
    /// Directory the process is started in.
    pub working_dir: PathBuf,
    /// Extra environment variables layered over the inherited environment.
    pub env: Vec<(String, String)>,
    /// Remediation shown when the program cannot be found.
    pub install_hint: Option<String>,
}

impl Invocation {
    /// Create an invocation with no arguments.
    pub fn new(program: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: working_dir.into(),
            env: Vec::new(),
            install_hint: None,
        }
    }

    /// Append a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add an environment variable for the child.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Attach the hint printed when the program is missing.
    #[must_use]
    pub fn with_install_hint(mut self, hint: impl Into<String>) -> Self {
        self.install_hint = Some(hint.into());
        self
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}

/// Shell-like rendering used in logs. Long arguments (prompts) are elided.
impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const MAX_ARG_CHARS: usize = 40;

        write!(f, "{}", self.program)?;
        for arg in &self.args {
            let shown: String = if arg.chars().count() > MAX_ARG_CHARS {
                let head: String = arg.chars().take(MAX_ARG_CHARS).collect();
                format!("{head}…")
            } else {
                arg.clone()
            };
            if shown.contains(char::is_whitespace) || shown.is_empty() {
                write!(f, " {shown:?}")?;
            } else {
                write!(f, " {shown}")?;
            }
        }
        Ok(())
    }
}
