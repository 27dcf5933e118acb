//! CLI module
//!
//! Command-line interface for running sources.
//!
//! # Commands
//!
//! - `test` - Fetch a source once without writing
//! - `sync` - Run one sync cycle
//! - `schedule` - Poll every source until Ctrl-C
//! - `auth-fields` - Describe the credentials of an auth type
//! - `intervals` - Show polling intervals
//! - `validate` - Check the sources file

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;

#[cfg(test)]
mod tests;
