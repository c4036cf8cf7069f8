//! Domain types shared by every gitaide component.
//!
//! These are plain data types with no process or filesystem behavior.
//! The runtime crate turns them into live sessions.

mod invocation;
mod prompt;
mod session;

pub use invocation::Invocation;
pub use prompt::{AssistantPrompt, ProviderKind, UnknownProvider};
pub use session::{
    DEFAULT_INTERRUPT_GRACE, DEFAULT_KILL_GRACE, DEFAULT_TERMINATE_GRACE, EscalationPolicy,
    OutputChunk, SessionOptions, SessionOutput, StreamKind, TerminationReason, TerminationReport,
    TerminationStage,
};
