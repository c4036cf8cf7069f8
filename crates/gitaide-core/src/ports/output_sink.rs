//! Output sink port for streamed process output.

use crate::domain::StreamKind;

/// Receives process output chunks as they are produced.
///
/// Chunks from one stream arrive in the order the process emitted them.
pub trait OutputSinkPort: Send + Sync {
    fn write(&self, kind: StreamKind, chunk: &str);
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl OutputSinkPort for NoopSink {
    fn write(&self, _kind: StreamKind, _chunk: &str) {}
}
