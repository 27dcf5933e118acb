//! Mapping and upsert module
//!
//! Turns extracted items into target records and writes them through a
//! [`crate::store::ContentStore`]:
//!
//! 1. resolve each mapping entry against the item
//! 2. split direct fields from meta fields
//! 3. skip items without a title
//! 4. update the published record with the same title, or insert a new one

mod mapper;
mod types;
mod upsert;

pub use mapper::{build_record, is_empty_title, MISSING_TITLE};
pub use types::{DirectField, ItemError, ItemOutcome, MappingTable, TargetRecord, UpsertReport};
pub use upsert::UpsertEngine;
