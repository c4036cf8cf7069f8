//! Exit-command listener.
//!
//! Watches an interactive input source on its own OS thread so that reading
//! the keyboard never blocks output streaming. Every line is reported to the
//! session loop; a line matching the exit command is reported as a
//! cancellation request instead.

use std::io::{self, BufRead};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

/// What the listener saw on its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerEvent {
    /// The exit command was typed.
    ExitCommand,
    /// Any other line, terminator included, for sessions that forward input.
    Line(String),
    /// The input reached end-of-file.
    Closed,
}

/// True when `line` is the exit command, ignoring surrounding whitespace.
pub fn is_exit_command(line: &str, exit_command: &str) -> bool {
    let wanted = exit_command.trim();
    !wanted.is_empty() && line.trim() == wanted
}

/// Handle to the listener thread.
///
/// Dropping the handle stops the listener: the stop flag is raised and the
/// thread is joined if it already finished, otherwise detached. A thread
/// blocked in `read_line` on a terminal cannot be woken portably; it exits on
/// the next line or EOF because its channel is closed by then.
///
/// That next line is consumed and discarded. With real standard input, the
/// first line typed after a session ends is therefore lost to whoever reads
/// stdin next; gitaide runs at most one interactive session per process.
pub struct ExitCommandListener {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ExitCommandListener {
    /// Start listening on `input`.
    ///
    /// With `exit_command` set to `None` every line is forwarded and no
    /// cancellation is ever raised.
    pub fn spawn<R>(
        input: R,
        exit_command: Option<String>,
        tx: UnboundedSender<ListenerEvent>,
    ) -> io::Result<Self>
    where
        R: BufRead + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("gitaide-exit-listener".to_string())
            .spawn(move || listen(input, exit_command.as_deref(), &thread_stop, &tx))?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Stop the listener. Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);

        let Some(handle) = self.handle.take() else {
            return;
        };

        if handle.is_finished() {
            if handle.join().is_err() {
                debug!("exit-command listener panicked");
            }
        } else {
            debug!("exit-command listener still blocked on input; detaching");
        }
    }
}

impl Drop for ExitCommandListener {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn listen<R: BufRead>(
    mut input: R,
    exit_command: Option<&str>,
    stop: &AtomicBool,
    tx: &UnboundedSender<ListenerEvent>,
) {
    let mut line = String::new();

    loop {
        line.clear();
        let read = input.read_line(&mut line);

        if stop.load(Ordering::Acquire) {
            break;
        }

        match read {
            Ok(0) => {
                let _ = tx.send(ListenerEvent::Closed);
                break;
            }
            Ok(_) => {
                if exit_command.is_some_and(|cmd| is_exit_command(&line, cmd)) {
                    debug!("exit command received");
                    let _ = tx.send(ListenerEvent::ExitCommand);
                    break;
                }
                if tx.send(ListenerEvent::Line(line.clone())).is_err() {
                    break;
                }
            }
            Err(e) => {
                debug!(error = %e, "exit-command listener read failed");
                let _ = tx.send(ListenerEvent::Closed);
                break;
            }
        }
    }

    debug!("exit-command listener exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tokio::sync::mpsc;

    #[test]
    fn exit_command_match_is_exact_after_trimming() {
        assert!(is_exit_command("/exit\n", "/exit"));
        assert!(is_exit_command("  /exit \r\n", "/exit"));
        assert!(!is_exit_command("/exit now\n", "/exit"));
        assert!(!is_exit_command("/EXIT\n", "/exit"));
        assert!(!is_exit_command("\n", "  "));
    }

    #[tokio::test]
    async fn forwards_lines_until_exit_command() {
        let input = Cursor::new("hello\nworld\n/quit\nnever seen\n");
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut listener =
            ExitCommandListener::spawn(input, Some("/quit".to_string()), tx).unwrap();

        assert_eq!(rx.recv().await, Some(ListenerEvent::Line("hello\n".into())));
        assert_eq!(rx.recv().await, Some(ListenerEvent::Line("world\n".into())));
        assert_eq!(rx.recv().await, Some(ListenerEvent::ExitCommand));
        // Thread exits after the exit command and drops its sender
        assert_eq!(rx.recv().await, None);

        listener.shutdown();
        listener.shutdown();
    }

    #[tokio::test]
    async fn reports_end_of_input() {
        let input = Cursor::new("only line\n");
        let (tx, mut rx) = mpsc::unbounded_channel();

        let _listener = ExitCommandListener::spawn(input, None, tx).unwrap();

        assert_eq!(
            rx.recv().await,
            Some(ListenerEvent::Line("only line\n".into()))
        );
        assert_eq!(rx.recv().await, Some(ListenerEvent::Closed));
        assert_eq!(rx.recv().await, None);
    }
}
