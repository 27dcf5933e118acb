// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # postsync
//!
//! Poll JSON APIs on a schedule and turn the items they return into
//! records in a content store.
//!
//! ## Features
//!
//! - **Multiple Auth Types**: Basic, OAuth 1.0a, OAuth 2 bearer, API key, TradeMe
//! - **Object Paths**: locate the item list anywhere in a response with a dot path
//! - **Declarative Mapping**: target field to source path, direct and meta fields
//! - **Idempotent Upserts**: items are matched to existing records by title
//! - **Rate Limiting**: per-source cooldown persisted across runs
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use postsync::pipeline::Pipeline;
//! use postsync::source::load_sources;
//! use postsync::state::StateManager;
//! use postsync::store::MemoryContentStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> postsync::Result<()> {
//!     let sources = load_sources("sources.yaml")?;
//!     let pipeline = Pipeline::with_stores(
//!         Arc::new(StateManager::in_memory()),
//!         Arc::new(MemoryContentStore::in_memory()),
//!     )?;
//!
//!     for source in &sources {
//!         let report = pipeline.run_cycle(source).await?;
//!         println!("{} created, {} updated", report.report.created, report.report.updated);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │          Scheduler (one recurring task per source)           │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//! ┌──────────────────────────────┴───────────────────────────────┐
//! │   Pipeline: gate → fetch → extract → map → upsert → report   │
//! └──────────────────────────────────────────────────────────────┘
//!                                │
//! ┌───────────┬───────────┬──────┴──────┬───────────┬───────────┐
//! │   Auth    │   HTTP    │   Extract   │  Mapping  │   Store   │
//! ├───────────┼───────────┼─────────────┼───────────┼───────────┤
//! │ Basic     │ Fetch     │ Collection  │ Direct    │ Lookup    │
//! │ OAuth1    │ Classify  │ Value       │ Meta      │ Insert    │
//! │ OAuth2    │ Rate Limit│             │ Title     │ Update    │
//! │ API Key   │           │             │           │           │
//! │ TradeMe   │           │             │           │           │
//! └───────────┴───────────┴─────────────┴───────────┴───────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication strategies
pub mod auth;

/// HTTP fetch client and rate limiting
pub mod http;

/// Rate-limit timestamp persistence
pub mod state;

/// Dot-path extraction
pub mod extract;

/// Item mapping and upserts
pub mod mapping;

/// Content store port and in-memory implementation
pub mod store;

/// Source configuration loading
pub mod source;

/// Fetch → extract → map → upsert cycle
pub mod pipeline;

/// Recurring per-source jobs
pub mod scheduler;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use auth::{auth_fields, AuthStrategy, AuthType};
pub use http::{FetchResult, HttpClient, RateLimiter};
pub use mapping::{MappingTable, UpsertEngine, UpsertReport};
pub use pipeline::{CycleOutcome, CycleReport, Pipeline};
pub use scheduler::{poll_interval, Scheduler};
pub use source::{load_sources, load_sources_from_str, SourceConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
