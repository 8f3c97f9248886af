//! Output JSON schema for analysis reports.
//!
//! Schema is versioned to allow future evolution.

use crate::aggregator::{MetricSummary, RequestTimeline, StartOffsetMode};
use crate::utils::config::SCHEMA_VERSION;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Top-level report structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Schema version for compatibility checking
    pub version: String,

    /// Display title chosen by the caller
    pub title: String,

    /// Dataset the report was computed from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    pub record_count: usize,

    /// Whether timelines carry the "Time To Last Byte Sent" stage
    pub has_posttransfer: bool,

    /// Reference point used for timeline starts
    pub start_offset_mode: StartOffsetMode,

    /// Per-metric statistics, in dataset metric order
    pub statistics: Vec<MetricSummary>,

    /// One timeline per request, in record order
    pub timelines: Vec<RequestTimeline>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

impl Report {
    /// Assemble a report stamped with the current time
    pub fn new(
        title: impl Into<String>,
        source: Option<String>,
        has_posttransfer: bool,
        start_offset_mode: StartOffsetMode,
        statistics: Vec<MetricSummary>,
        timelines: Vec<RequestTimeline>,
    ) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            title: title.into(),
            source,
            record_count: timelines.len(),
            has_posttransfer,
            start_offset_mode,
            statistics,
            timelines,
            generated_at: Utc::now().to_rfc3339(),
        }
    }

    /// Earliest start and latest end across all timelines
    pub fn time_span(&self) -> Option<(f64, f64)> {
        let start = self
            .timelines
            .iter()
            .map(RequestTimeline::start)
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.min(v))));
        let end = self
            .timelines
            .iter()
            .map(RequestTimeline::end)
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))));

        start.zip(end)
    }
}
