//! Output stream readers (non-UTF8-safe) and the stdin writer.
//!
//! Assistant CLIs and the tools they drive can emit non-UTF8 bytes.
//! `BufReader::lines()` would end the reader on invalid UTF-8, so this reads
//! raw bytes up to each newline and decodes lossily.

use gitaide_core::{OutputChunk, StreamKind};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::ChildStdin;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::debug;

/// Spawn a task that forwards every line of `stream` to `tx`.
///
/// Line terminators are kept so that concatenating chunks reproduces the
/// stream exactly. The task ends at EOF, on a read error, or once the
/// receiver is gone.
pub fn spawn_stream_reader(
    stream: impl AsyncRead + Unpin + Send + 'static,
    kind: StreamKind,
    tx: UnboundedSender<OutputChunk>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf: Vec<u8> = Vec::with_capacity(1024);

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break, // EOF
                Ok(_) => {
                    let chunk = OutputChunk {
                        kind,
                        text: String::from_utf8_lossy(&buf).into_owned(),
                    };
                    if tx.send(chunk).is_err() {
                        debug!(stream = kind.as_str(), "output receiver dropped");
                        break;
                    }
                }
                Err(e) => {
                    debug!(stream = kind.as_str(), error = %e, "stream reader exiting due to read error");
                    break;
                }
            }
        }

        debug!(stream = kind.as_str(), "stream reader task exiting");
    })
}

/// Spawn a task that writes every line sent on the returned channel to
/// `stdin`.
///
/// Writes happen off the session loop, so a child that stops reading cannot
/// hold up cancellation or the deadline. Dropping the sender closes `stdin`.
pub fn spawn_stdin_writer(mut stdin: ChildStdin) -> (UnboundedSender<String>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let handle = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            let written = match stdin.write_all(line.as_bytes()).await {
                Ok(()) => stdin.flush().await,
                Err(e) => Err(e),
            };
            if let Err(e) = written {
                debug!(error = %e, "child stopped accepting input");
                break;
            }
        }
        debug!("stdin writer task exiting");
    });
    (tx, handle)
}

/// Aborts the stream tasks when dropped, on every exit path of a session.
#[derive(Default)]
pub struct ReaderGuard {
    handles: Vec<JoinHandle<()>>,
}

impl ReaderGuard {
    pub fn push(&mut self, handle: JoinHandle<()>) {
        self.handles.push(handle);
    }
}

impl Drop for ReaderGuard {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}
