//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Poll JSON APIs and sync their items into a content store
#[derive(Parser, Debug)]
#[command(name = "postsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Sources file (YAML or JSON)
    #[arg(short = 'S', long, global = true, default_value = "sources.yaml")]
    pub sources: PathBuf,

    /// Content store file (JSON); in-memory when omitted
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Rate-limit state file (JSON); in-memory when omitted
    #[arg(short, long, global = true)]
    pub state: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch one source and print the raw outcome, without writing anything
    Test {
        /// Source id
        #[arg(long)]
        source: String,
    },

    /// Run one sync cycle for one source, or for all of them
    Sync {
        /// Source id (default: every source)
        #[arg(long)]
        source: Option<String>,
    },

    /// Poll every source on its interval until interrupted
    Schedule,

    /// List the credential fields an auth type needs
    AuthFields {
        /// Auth type (none, basic, oauth1, oauth2, api_key, trademe)
        auth_type: String,
    },

    /// Show the polling interval of every source
    Intervals,

    /// Validate the sources file
    Validate,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Indented JSON
    Pretty,
}
