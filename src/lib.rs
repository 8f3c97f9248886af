//! Curl Metrics
//!
//! Statistics and phase timelines for per-request curl timing data.
//!
//! A dataset is a JSON array of `curl --write-out` timing objects. From it
//! this crate derives:
//! - per-metric mean/min/max/variance/stdev ([`aggregator::aggregate`])
//! - a contiguous, non-overlapping phase timeline per request
//!   ([`aggregator::reconstruct`])
//!
//! ## Getting Started
//!
//! ```bash
//! curl-metrics analyze --file requests.json --summary
//! ```
//!
//! ```ignore
//! use curl_metrics::aggregator::{aggregate, reconstruct, TimelineOptions};
//! use curl_metrics::parser::load_records;
//!
//! let records = load_records("requests.json")?;
//! let stats = aggregate(&records, &records.schema().metrics)?;
//! let timelines = reconstruct(
//!     &records,
//!     records.schema().has_posttransfer,
//!     &TimelineOptions::default(),
//! )?;
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
