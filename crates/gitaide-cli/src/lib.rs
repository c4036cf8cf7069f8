#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]

pub mod bootstrap;
pub mod changelog;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;
pub mod prompts;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap, watch_interrupts};
pub use commands::{Commands, ConfigCommand};
pub use error::CliError;
pub use parser::Cli;
