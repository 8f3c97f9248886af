//! Aggregation of timing records into statistics and timelines.
//!
//! This module transforms a validated record set into:
//! - Per-metric descriptive statistics (for tables and bar charts)
//! - Per-request phase timelines (for Gantt-style charts)
//!
//! Both computations are pure and independent of each other.

pub mod stats;
pub mod timeline;

// Re-export main types and functions
pub use stats::{aggregate, MetricSeries, MetricStatistics, MetricSummary};
pub use timeline::{
    reconstruct, reconstruct_record, NegativeDurationPolicy, RequestTimeline, Stage,
    StageInterval, StartOffsetMode, TimelineOptions,
};
