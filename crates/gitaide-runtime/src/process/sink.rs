//! Output sink implementations.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use gitaide_core::{OutputSinkPort, StreamKind};

/// Writes chunks straight to the terminal, flushing after each one so the
/// user sees output as soon as the process produces it.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl OutputSinkPort for ConsoleSink {
    fn write(&self, kind: StreamKind, chunk: &str) {
        // A closed terminal must not take the session down with it
        let _ = match kind {
            StreamKind::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(chunk.as_bytes()).and_then(|()| out.flush())
            }
            StreamKind::Stderr => {
                let mut err = io::stderr().lock();
                err.write_all(chunk.as_bytes()).and_then(|()| err.flush())
            }
        };
    }
}

/// Records every chunk in memory, in arrival order.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    chunks: Arc<Mutex<Vec<(StreamKind, String)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All chunks received so far.
    pub fn chunks(&self) -> Vec<(StreamKind, String)> {
        self.chunks
            .lock()
            .map(|chunks| chunks.clone())
            .unwrap_or_default()
    }

    /// Concatenation of the chunks from one stream.
    pub fn text(&self, kind: StreamKind) -> String {
        self.chunks()
            .into_iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, text)| text)
            .collect()
    }
}

impl OutputSinkPort for MemorySink {
    fn write(&self, kind: StreamKind, chunk: &str) {
        if let Ok(mut chunks) = self.chunks.lock() {
            chunks.push((kind, chunk.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_keeps_order_per_stream() {
        let sink = MemorySink::new();
        sink.write(StreamKind::Stdout, "a\n");
        sink.write(StreamKind::Stderr, "warn\n");
        sink.write(StreamKind::Stdout, "b\n");

        assert_eq!(sink.text(StreamKind::Stdout), "a\nb\n");
        assert_eq!(sink.text(StreamKind::Stderr), "warn\n");
        assert_eq!(sink.chunks().len(), 3);
    }

    #[test]
    fn clones_share_storage() {
        let sink = MemorySink::new();
        let handle = sink.clone();
        handle.write(StreamKind::Stdout, "shared");
        assert_eq!(sink.text(StreamKind::Stdout), "shared");
    }
}
