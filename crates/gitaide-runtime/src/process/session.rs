//! Managed external process session.
//!
//! A `Session` runs one external program to completion, or until it is
//! cancelled by the caller, by the exit command, or by the timeout. All three
//! triggers go through the same [`Terminator`], and every exit path releases
//! the child, the reader tasks and the listener thread.

use std::io::BufRead;
use std::process::ExitStatus;
use std::sync::Arc;
use std::time::Duration;

use gitaide_core::{
    Invocation, NoopSink, OutputChunk, OutputSinkPort, SessionError, SessionOptions,
    SessionOutput, StreamKind, TerminationReason, TerminationReport,
};
use tokio::process::Child;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::{Instant, sleep_until, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::launch;
use super::listener::{ExitCommandListener, ListenerEvent};
use super::shutdown::Terminator;
use super::stream::{ReaderGuard, spawn_stdin_writer, spawn_stream_reader};

/// How long to keep collecting output after the process is gone.
///
/// Bounded because a descendant may inherit the pipes and keep them open.
const OUTPUT_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Interactive input handed to the exit-command listener.
pub type InteractiveInput = Box<dyn BufRead + Send>;

/// One run of an external process.
///
/// Owned by a single caller and consumed by [`Session::run`].
pub struct Session {
    invocation: Invocation,
    options: SessionOptions,
    sink: Arc<dyn OutputSinkPort>,
    cancel: CancellationToken,
    input: Option<InteractiveInput>,
    forward_input: bool,
}

/// How the main loop ended.
enum Outcome {
    Exited(ExitStatus),
    Terminate(TerminationReason),
}

/// Captured output, in emission order per stream.
#[derive(Default)]
struct Buffers {
    stdout: String,
    stderr: String,
}

impl Buffers {
    fn record(&mut self, chunk: &OutputChunk, sink: Option<&dyn OutputSinkPort>) {
        if let Some(sink) = sink {
            sink.write(chunk.kind, &chunk.text);
        }
        match chunk.kind {
            StreamKind::Stdout => self.stdout.push_str(&chunk.text),
            StreamKind::Stderr => self.stderr.push_str(&chunk.text),
        }
    }
}

impl Session {
    pub fn new(invocation: Invocation, options: SessionOptions) -> Self {
        Self {
            invocation,
            options,
            sink: Arc::new(NoopSink),
            cancel: CancellationToken::new(),
            input: None,
            forward_input: false,
        }
    }

    /// Send streamed output to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn OutputSinkPort>) -> Self {
        self.sink = sink;
        self
    }

    /// Use `token` as the user-interrupt trigger.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Make the session interactive: the exit command typed on `input`, if
    /// configured, cancels the session.
    ///
    /// The child's stdin stays closed unless
    /// [`with_stdin_forwarding`](Self::with_stdin_forwarding) is also set.
    #[must_use]
    pub fn with_input(mut self, input: InteractiveInput) -> Self {
        self.input = Some(input);
        self
    }

    /// Forward every other line typed on the interactive input to the
    /// child's stdin, and close it when the input ends.
    #[must_use]
    pub fn with_stdin_forwarding(mut self) -> Self {
        self.forward_input = true;
        self
    }

    /// Token that cancels this session as a user interrupt.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub const fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    /// Run the process and wait for the session to end.
    ///
    /// Returns the captured output on a zero exit status.
    ///
    /// # Errors
    ///
    /// - `Launch` / `Spawn` when the process cannot be started
    /// - `Timeout` / `Interrupted` when the session was cancelled; the process
    ///   has been stopped before this returns
    /// - `Process` for a non-zero exit, with captured stderr
    /// - `Io` if the listener thread cannot be started
    pub async fn run(self) -> Result<SessionOutput, SessionError> {
        let Self {
            invocation,
            options,
            sink,
            cancel,
            input,
            forward_input,
        } = self;

        let started = Instant::now();
        let pipe_stdin = forward_input && input.is_some();
        let mut child = launch::spawn(&invocation, pipe_stdin)?;
        info!(command = %invocation, pid = ?child.id(), "process launched");

        // Readers
        let (chunk_tx, mut chunk_rx) = mpsc::unbounded_channel();
        let mut readers = ReaderGuard::default();
        if let Some(stdout) = child.stdout.take() {
            readers.push(spawn_stream_reader(stdout, StreamKind::Stdout, chunk_tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(spawn_stream_reader(stderr, StreamKind::Stderr, chunk_tx));
        } else {
            drop(chunk_tx);
        }

        // Stdin writer, only when typed lines are forwarded
        let mut stdin_tx = child.stdin.take().map(|stdin| {
            let (tx, handle) = spawn_stdin_writer(stdin);
            readers.push(handle);
            tx
        });

        // Exit-command listener
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let mut listener = match input {
            Some(input) => {
                let listener =
                    ExitCommandListener::spawn(input, options.exit_command.clone(), event_tx)
                        .map_err(|source| SessionError::Io {
                            program: invocation.program.clone(),
                            source,
                        })?;
                Some(listener)
            }
            None => {
                drop(event_tx);
                None
            }
        };

        let forward = options.streaming.then_some(sink.as_ref());
        let mut buffers = Buffers::default();
        let deadline = options.timeout.map(|t| started + t);

        let mut output_open = true;
        let mut events_open = listener.is_some();

        let outcome = loop {
            tokio::select! {
                biased;

                () = cancel.cancelled() => {
                    info!(pid = ?child.id(), "interrupt requested");
                    break Outcome::Terminate(TerminationReason::UserInterrupt);
                }

                event = event_rx.recv(), if events_open => match event {
                    Some(ListenerEvent::ExitCommand) => {
                        info!(pid = ?child.id(), "exit command received");
                        break Outcome::Terminate(TerminationReason::ExitCommand);
                    }
                    Some(ListenerEvent::Line(line)) => {
                        if stdin_tx.as_ref().is_some_and(|tx| tx.send(line).is_err()) {
                            stdin_tx = None;
                        }
                    }
                    Some(ListenerEvent::Closed) | None => {
                        events_open = false;
                        // EOF on the user's input becomes EOF for the child
                        stdin_tx = None;
                    }
                },

                () = deadline_reached(deadline) => {
                    // Re-validate right before acting so a process that just
                    // finished is not reported as timed out.
                    match child.try_wait() {
                        Ok(Some(status)) => break Outcome::Exited(status),
                        _ => {
                            info!(pid = ?child.id(), "timeout elapsed");
                            break Outcome::Terminate(TerminationReason::Timeout);
                        }
                    }
                }

                chunk = chunk_rx.recv(), if output_open => match chunk {
                    Some(chunk) => buffers.record(&chunk, forward),
                    None => output_open = false,
                },

                status = child.wait() => match status {
                    Ok(status) => break Outcome::Exited(status),
                    Err(source) => {
                        return Err(SessionError::Io {
                            program: invocation.program.clone(),
                            source,
                        });
                    }
                },
            }
        };

        drop(stdin_tx);
        if let Some(listener) = listener.as_mut() {
            listener.shutdown();
        }

        match outcome {
            Outcome::Exited(status) => {
                drain_output(&mut chunk_rx, &mut buffers, forward).await;
                debug!(?status, elapsed = ?started.elapsed(), "process exited");
                finish(invocation, status, buffers, started.elapsed())
            }
            Outcome::Terminate(reason) => {
                let report = terminate(&mut child, &options, reason, started).await;
                drain_output(&mut chunk_rx, &mut buffers, forward).await;

                Err(match reason {
                    TerminationReason::Timeout => SessionError::Timeout {
                        program: invocation.program,
                        after: options.timeout.unwrap_or_default(),
                        output: buffers.stdout,
                        report,
                    },
                    TerminationReason::UserInterrupt | TerminationReason::ExitCommand => {
                        SessionError::Interrupted {
                            program: invocation.program,
                            output: buffers.stdout,
                            report,
                        }
                    }
                })
            }
        }
    }
}

async fn terminate(
    child: &mut Child,
    options: &SessionOptions,
    reason: TerminationReason,
    started: Instant,
) -> TerminationReport {
    let mut terminator = Terminator::new(options.escalation);
    let outcome = terminator.terminate(child).await;

    let report = TerminationReport {
        reason,
        escalation: outcome.escalation,
        exited: outcome.exited(),
        exit_code: outcome.status.and_then(|s| s.code()),
        elapsed: started.elapsed(),
    };

    if report.exited {
        info!(%reason, escalation = %report.escalation, elapsed = ?report.elapsed, "session terminated");
    } else {
        warn!(%reason, "session terminated but process exit could not be confirmed");
    }
    report
}

fn finish(
    invocation: Invocation,
    status: ExitStatus,
    buffers: Buffers,
    elapsed: Duration,
) -> Result<SessionOutput, SessionError> {
    if status.success() {
        Ok(SessionOutput {
            stdout: buffers.stdout,
            stderr: buffers.stderr,
            exit_code: status.code(),
            elapsed,
        })
    } else {
        Err(SessionError::Process {
            program: invocation.program,
            code: status.code(),
            stdout: buffers.stdout,
            stderr: buffers.stderr.trim_end().to_string(),
        })
    }
}

/// Collect whatever the readers still have, up to [`OUTPUT_DRAIN_TIMEOUT`].
async fn drain_output(
    rx: &mut UnboundedReceiver<OutputChunk>,
    buffers: &mut Buffers,
    forward: Option<&dyn OutputSinkPort>,
) {
    let until = Instant::now() + OUTPUT_DRAIN_TIMEOUT;
    loop {
        match timeout(until.saturating_duration_since(Instant::now()), rx.recv()).await {
            Ok(Some(chunk)) => buffers.record(&chunk, forward),
            Ok(None) => break,
            Err(_) => {
                debug!("output pipes still open after exit; giving up on remaining output");
                break;
            }
        }
    }
}

async fn deadline_reached(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}
