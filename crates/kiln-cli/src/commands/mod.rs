//! Subcommand handlers, one module per command.

pub mod completions;
pub mod config;
pub mod fetch;
pub mod init;
pub mod probe;
