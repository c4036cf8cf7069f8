//! Tool probing for `gitaide doctor`.
//!
//! Looks each tool up on `PATH` and asks it for its version. Probing is
//! synchronous and short; it never goes through a managed session.

mod probe;

pub use probe::{ToolProbe, ToolStatus, first_version_line, probe_tool};
