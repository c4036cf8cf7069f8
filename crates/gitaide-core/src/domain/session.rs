//! Session options and the vocabulary of a session's lifecycle.

use std::fmt;
use std::time::Duration;

/// Wait after the interrupt signal before escalating.
pub const DEFAULT_INTERRUPT_GRACE: Duration = Duration::from_secs(5);

/// Wait after the terminate signal before force-killing.
pub const DEFAULT_TERMINATE_GRACE: Duration = Duration::from_secs(2);

/// Wait for the kernel to reap the process after a force-kill.
pub const DEFAULT_KILL_GRACE: Duration = Duration::from_secs(2);

/// Grace periods for the escalating termination sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalationPolicy {
    pub interrupt_grace: Duration,
    pub terminate_grace: Duration,
    pub kill_grace: Duration,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self {
            interrupt_grace: DEFAULT_INTERRUPT_GRACE,
            terminate_grace: DEFAULT_TERMINATE_GRACE,
            kill_grace: DEFAULT_KILL_GRACE,
        }
    }
}

impl EscalationPolicy {
    /// Upper bound on the time spent between the first signal and giving up.
    pub fn worst_case(&self) -> Duration {
        self.interrupt_grace + self.terminate_grace + self.kill_grace
    }
}

/// How a session should run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Forward output to the sink as it arrives.
    pub streaming: bool,
    /// Line that cancels the session when typed on an interactive input.
    pub exit_command: Option<String>,
    /// Wall-clock budget measured from launch.
    pub timeout: Option<Duration>,
    pub escalation: EscalationPolicy,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            streaming: true,
            exit_command: None,
            timeout: None,
            escalation: EscalationPolicy::default(),
        }
    }
}

impl SessionOptions {
    /// Options for short helper commands: capture only, no forwarding.
    pub fn captured() -> Self {
        Self {
            streaming: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    #[must_use]
    pub fn with_exit_command(mut self, command: Option<String>) -> Self {
        self.exit_command = command;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_escalation(mut self, escalation: EscalationPolicy) -> Self {
        self.escalation = escalation;
        self
    }
}

/// Which captured stream a chunk came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

/// A piece of process output, usually one line including its terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputChunk {
    pub kind: StreamKind,
    pub text: String,
}

/// Why a session is being stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The user pressed the interrupt key (or the caller cancelled).
    UserInterrupt,
    /// The configured exit command was typed.
    ExitCommand,
    /// The session timeout elapsed.
    Timeout,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UserInterrupt => "user interrupt",
            Self::ExitCommand => "exit command",
            Self::Timeout => "timeout",
        })
    }
}

/// Progress of the termination state machine.
///
/// Ordered so that `max` gives the furthest escalation reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TerminationStage {
    Running,
    InterruptSent,
    TerminateSent,
    Killed,
    Exited,
}

impl fmt::Display for TerminationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Running => "running",
            Self::InterruptSent => "interrupt sent",
            Self::TerminateSent => "terminate sent",
            Self::Killed => "killed",
            Self::Exited => "exited",
        })
    }
}

/// Summary of one termination sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationReport {
    pub reason: TerminationReason,
    /// Strongest signal that had to be sent; `Running` if the process was
    /// already gone when termination started.
    pub escalation: TerminationStage,
    /// Whether the process was confirmed dead and reaped.
    pub exited: bool,
    pub exit_code: Option<i32>,
    /// Time since launch when the sequence finished.
    pub elapsed: Duration,
}

/// Result of a session that ran to natural completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub elapsed: Duration,
}
