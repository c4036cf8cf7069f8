//! Managed external process sessions.
//!
//! # Structure
//!
//! - `Session` - launch, stream, listen, supervise and terminate one process
//! - `launch` - spawning with piped stdio, process groups and kill-on-drop
//! - `stream` - lossy line readers feeding the session loop, stdin writer
//! - `listener` - exit-command listener thread for interactive sessions
//! - `shutdown` - the SIGINT → SIGTERM → SIGKILL `Terminator`
//! - `sink` - console and in-memory output sinks

mod launch;
mod listener;
mod session;
pub mod shutdown;
mod sink;
mod stream;

pub use launch::spawn;
pub use listener::{ExitCommandListener, ListenerEvent, is_exit_command};
pub use session::{InteractiveInput, Session};
pub use shutdown::{EscalationOutcome, Terminator, pid_exists};
pub use sink::{ConsoleSink, MemorySink};
pub use stream::{spawn_stdin_writer, spawn_stream_reader};
