//! End-to-end session tests against real child processes.
//!
//! Unix only: they rely on `sh`, `sleep`, process groups and signals.

#![cfg(unix)]

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use gitaide_core::{
    EscalationPolicy, Invocation, SessionError, SessionOptions, StreamKind, TerminationReason,
    TerminationStage,
};
use gitaide_runtime::process::{MemorySink, Session, pid_exists};
use tokio_util::sync::CancellationToken;

fn sh(dir: &Path, script: &str) -> Invocation {
    Invocation::new("sh", dir).args(["-c", script])
}

fn fast_escalation() -> EscalationPolicy {
    EscalationPolicy {
        interrupt_grace: Duration::from_secs(2),
        terminate_grace: Duration::from_secs(1),
        kill_grace: Duration::from_secs(1),
    }
}

/// Prints its own pid, then ticks until stopped.
const TICKER: &str = "echo $$; while true; do echo tick; sleep 0.1; done";

fn pid_from_output(output: &str) -> u32 {
    output
        .lines()
        .next()
        .and_then(|l| l.trim().parse().ok())
        .expect("first line should be the pid")
}

/// Every line of `output` that is a pid.
fn pids_from_output(output: &str) -> Vec<u32> {
    output.lines().filter_map(|l| l.trim().parse().ok()).collect()
}

/// True once `pid` is gone. Orphans are reaped by init, so a zombie counts as
/// gone.
async fn gone_soon(pid: u32) -> bool {
    for _ in 0..50 {
        let zombie = std::fs::read_to_string(format!("/proc/{pid}/stat"))
            .is_ok_and(|stat| stat.rsplit(") ").next().is_some_and(|s| s.starts_with('Z')));
        if zombie || !pid_exists(pid) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

#[tokio::test]
async fn timeout_stops_long_running_process() {
    let dir = tempfile::tempdir().unwrap();
    let timeout = Duration::from_secs(1);
    let options = SessionOptions::captured().with_timeout(Some(timeout));

    let started = Instant::now();
    let err = Session::new(Invocation::new("sleep", dir.path()).arg("30"), options)
        .run()
        .await
        .unwrap_err();

    assert!(started.elapsed() < timeout + Duration::from_secs(7));
    match err {
        SessionError::Timeout { after, report, .. } => {
            assert_eq!(after, timeout);
            assert_eq!(report.reason, TerminationReason::Timeout);
            assert!(report.exited);
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn interrupt_during_streaming_leaves_no_process() {
    let dir = tempfile::tempdir().unwrap();
    let sink = MemorySink::new();
    let token = CancellationToken::new();

    let session = Session::new(
        sh(dir.path(), TICKER),
        SessionOptions::default().with_escalation(fast_escalation()),
    )
    .with_sink(Arc::new(sink.clone()))
    .with_cancellation(token.clone());

    let cancel = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        token.cancel();
    });

    let err = session.run().await.unwrap_err();
    cancel.await.unwrap();

    assert!(err.is_cancellation());
    assert_eq!(err.termination_reason(), Some(TerminationReason::UserInterrupt));
    let output = err.partial_output().unwrap_or_default();
    assert!(output.contains("tick"));
    assert!(!pid_exists(pid_from_output(output)));
    assert_eq!(sink.text(StreamKind::Stdout), output);
}

#[tokio::test]
async fn exit_command_and_interrupt_clean_up_the_same_way() {
    let dir = tempfile::tempdir().unwrap();
    let options = SessionOptions::captured()
        .with_exit_command(Some("/quit".into()))
        .with_escalation(fast_escalation());

    let by_command = Session::new(sh(dir.path(), TICKER), options.clone())
        .with_input(Box::new(Cursor::new(b"/quit\n".to_vec())))
        .run()
        .await
        .unwrap_err();

    let token = CancellationToken::new();
    token.cancel();
    let by_interrupt = Session::new(sh(dir.path(), TICKER), options)
        .with_cancellation(token)
        .run()
        .await
        .unwrap_err();

    let (
        SessionError::Interrupted {
            report: command_report,
            ..
        },
        SessionError::Interrupted {
            report: interrupt_report,
            ..
        },
    ) = (&by_command, &by_interrupt)
    else {
        panic!("expected two interruptions, got {by_command:?} and {by_interrupt:?}");
    };

    assert_eq!(command_report.reason, TerminationReason::ExitCommand);
    assert_eq!(interrupt_report.reason, TerminationReason::UserInterrupt);
    assert!(command_report.exited && interrupt_report.exited);
    assert_eq!(command_report.escalation, interrupt_report.escalation);
}

#[tokio::test]
async fn cancel_racing_timeout_does_not_hang() {
    let dir = tempfile::tempdir().unwrap();
    let token = CancellationToken::new();
    let options = SessionOptions::captured()
        .with_timeout(Some(Duration::from_secs(1)))
        .with_escalation(fast_escalation());

    let session = Session::new(Invocation::new("sleep", dir.path()).arg("30"), options)
        .with_cancellation(token.clone());
    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        token.cancel();
        // A second request after the first must be harmless
        token.cancel();
    });

    let result = tokio::time::timeout(Duration::from_secs(10), session.run())
        .await
        .expect("session must finish");
    canceller.await.unwrap();

    let err = result.unwrap_err();
    assert!(err.is_cancellation());
    assert!(matches!(
        err.termination_reason(),
        Some(TerminationReason::Timeout | TerminationReason::UserInterrupt)
    ));
}

#[tokio::test]
async fn streamed_chunks_match_the_buffer() {
    let dir = tempfile::tempdir().unwrap();
    let sink = MemorySink::new();
    let script = "i=1; while [ $i -le 100 ]; do echo $i; i=$((i+1)); sleep 0.01; done";

    let output = Session::new(sh(dir.path(), script), SessionOptions::default())
        .with_sink(Arc::new(sink.clone()))
        .run()
        .await
        .unwrap();

    let expected: String = (1..=100).map(|i| format!("{i}\n")).collect();
    assert_eq!(output.stdout, expected);
    assert_eq!(sink.text(StreamKind::Stdout), output.stdout);
    assert_eq!(output.exit_code, Some(0));
}

#[tokio::test]
async fn missing_binary_is_a_launch_error() {
    let dir = tempfile::tempdir().unwrap();
    let invocation = Invocation::new("gitaide-no-such-program", dir.path())
        .with_install_hint("brew install gitaide-no-such-program");

    let err = Session::new(invocation, SessionOptions::default())
        .run()
        .await
        .unwrap_err();

    match err {
        SessionError::Launch { program, hint } => {
            assert_eq!(program, "gitaide-no-such-program");
            assert_eq!(hint, "brew install gitaide-no-such-program");
        }
        other => panic!("expected launch error, got {other:?}"),
    }
}

#[tokio::test]
async fn nonzero_exit_reports_stderr() {
    let dir = tempfile::tempdir().unwrap();

    let err = Session::new(sh(dir.path(), "echo boom >&2; exit 1"), SessionOptions::default())
        .run()
        .await
        .unwrap_err();

    match err {
        SessionError::Process { code, stderr, .. } => {
            assert_eq!(code, Some(1));
            assert_eq!(stderr, "boom");
        }
        other => panic!("expected process error, got {other:?}"),
    }
}

#[tokio::test]
async fn process_finishing_before_timeout_returns_output() {
    let dir = tempfile::tempdir().unwrap();
    let options = SessionOptions::default().with_timeout(Some(Duration::from_secs(10)));

    let output = Session::new(sh(dir.path(), "sleep 2; echo done"), options)
        .run()
        .await
        .unwrap();

    assert_eq!(output.stdout, "done\n");
    assert!(output.elapsed >= Duration::from_secs(2));
}

#[tokio::test]
async fn typed_lines_reach_the_child() {
    let dir = tempfile::tempdir().unwrap();
    let options = SessionOptions::captured().with_exit_command(Some("/exit".into()));

    let output = Session::new(Invocation::new("head", dir.path()).args(["-n", "1"]), options)
        .with_input(Box::new(Cursor::new(b"hello\n".to_vec())))
        .with_stdin_forwarding()
        .run()
        .await
        .unwrap();

    assert_eq!(output.stdout, "hello\n");
}

#[tokio::test]
async fn interrupt_stops_background_members_of_the_group() {
    let dir = tempfile::tempdir().unwrap();
    let token = CancellationToken::new();
    // Background jobs of a non-interactive shell ignore SIGINT
    let session = Session::new(
        sh(dir.path(), "sleep 30 & echo $!; wait"),
        SessionOptions::captured().with_escalation(fast_escalation()),
    )
    .with_cancellation(token.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        token.cancel();
    });
    let started = Instant::now();
    let err = session.run().await.unwrap_err();
    canceller.await.unwrap();

    // No survivor holds the pipes open, so the output drain ends at once
    assert!(started.elapsed() < Duration::from_secs(2), "{:?}", started.elapsed());
    assert_eq!(err.termination_reason(), Some(TerminationReason::UserInterrupt));
    let background = pid_from_output(err.partial_output().unwrap_or_default());
    assert!(gone_soon(background).await, "background job {background} outlived the session");
}

#[tokio::test]
async fn timeout_kills_a_process_ignoring_signals() {
    let dir = tempfile::tempdir().unwrap();
    let timeout = Duration::from_secs(1);
    let policy = fast_escalation();
    let options = SessionOptions::captured()
        .with_timeout(Some(timeout))
        .with_escalation(policy);
    let script = "trap '' INT TERM; echo $$; sleep 30 & echo $!; wait";

    let started = Instant::now();
    let err = Session::new(sh(dir.path(), script), options)
        .run()
        .await
        .unwrap_err();
    let elapsed = started.elapsed();

    assert!(elapsed < timeout + policy.worst_case(), "{elapsed:?}");
    let SessionError::Timeout { report, output, .. } = err else {
        panic!("expected timeout, got {err:?}");
    };
    assert_eq!(report.escalation, TerminationStage::Killed);
    assert!(report.exited);

    let pids = pids_from_output(&output);
    assert_eq!(pids.len(), 2, "{output:?}");
    for pid in pids {
        assert!(gone_soon(pid).await, "{pid} outlived the session");
    }
}

#[tokio::test]
async fn child_stdin_stays_closed_without_forwarding() {
    let dir = tempfile::tempdir().unwrap();
    let (keep_open, rx) = std::sync::mpsc::channel::<()>();
    let input = std::io::BufReader::new(OpenInput(rx));

    let output = tokio::time::timeout(
        Duration::from_secs(5),
        Session::new(sh(dir.path(), "cat; echo answer"), SessionOptions::captured())
            .with_input(Box::new(input))
            .run(),
    )
    .await
    .expect("child must see EOF on stdin")
    .unwrap();

    assert_eq!(output.stdout, "answer\n");
    drop(keep_open);
}

/// Input that blocks until its sender is dropped.
struct OpenInput(std::sync::mpsc::Receiver<()>);

impl std::io::Read for OpenInput {
    fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
        let _ = self.0.recv();
        Ok(0)
    }
}
