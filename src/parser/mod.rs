//! Timing record decoding and schema validation.
//!
//! This module handles:
//! - Decoding JSON arrays of curl timing objects
//! - Validating required fields against the first record
//! - Describing which metrics a dataset carries

pub mod record;
pub mod schema;

// Re-export main types
pub use record::{load_records, parse_records, RecordSet, TimingRecord};
pub use schema::{validate_schema, DatasetSchema, Metric};
