//! Escalating shutdown for session processes.
//!
//! - `Terminator`: SIGINT → SIGTERM → SIGKILL state machine over a `Child`
//! - `pid_exists`: process-table check used to confirm nothing was left behind

mod escalation;
mod liveness;

pub use escalation::{EscalationOutcome, Terminator};
pub use liveness::pid_exists;
