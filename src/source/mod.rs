//! Source configuration
//!
//! Loads the list of polled sources from a YAML or JSON file:
//!
//! ```yaml
//! sources:
//!   - id: events
//!     url: https://api.example.com/events
//!     object_path: result.items
//!     target_collection: event
//!     mapping:
//!       post_title: name
//!       venue: place.name
//! ```

mod parser;
mod types;

pub use parser::{load_sources, load_sources_from_str, validate_source, SourceFormat};
pub use types::{SourceConfig, SourcesFile, DEFAULT_REQUESTS_PER_DAY};
