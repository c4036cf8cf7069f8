#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]

pub mod assistant;
pub mod process;
pub mod providers;
pub mod system;
pub mod vcs;

pub use assistant::{AssistantRunner, GenerateControls};
pub use process::{ConsoleSink, MemorySink, Session, Terminator, pid_exists};
pub use providers::{provider_for, provider_from_settings};
pub use system::{ToolProbe, ToolStatus, probe_tool};
pub use vcs::Vcs;
