//! Timing field descriptors and dataset schema validation.
//!
//! The schema of a dataset is decided once, from its first record, and is
//! assumed to hold for every record that follows. This is a best-effort
//! heuristic: later records are only checked when they are decoded.

use super::record::TimingRecord;
use crate::utils::config::{
    FIELD_APPCONNECT, FIELD_CONNECT, FIELD_NAMELOOKUP, FIELD_OFFSET, FIELD_POSTTRANSFER,
    FIELD_PRETRANSFER, FIELD_REDIRECT, FIELD_STARTTRANSFER, FIELD_TOTAL,
};
use crate::utils::error::ValidationError;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// An aggregatable timing field of a record
///
/// `time_offset` is not a metric: it positions a request in the
/// session and is never aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "time_namelookup")]
    NameLookup,
    #[serde(rename = "time_connect")]
    Connect,
    #[serde(rename = "time_redirect")]
    Redirect,
    #[serde(rename = "time_appconnect")]
    AppConnect,
    #[serde(rename = "time_pretransfer")]
    PreTransfer,
    #[serde(rename = "time_starttransfer")]
    StartTransfer,
    #[serde(rename = "time_posttransfer")]
    PostTransfer,
    #[serde(rename = "time_total")]
    Total,
}

impl Metric {
    /// All metrics in canonical order
    pub const ALL: [Metric; 8] = [
        Metric::NameLookup,
        Metric::Connect,
        Metric::Redirect,
        Metric::AppConnect,
        Metric::PreTransfer,
        Metric::StartTransfer,
        Metric::PostTransfer,
        Metric::Total,
    ];

    /// Metrics every record must carry
    pub const REQUIRED: [Metric; 7] = [
        Metric::NameLookup,
        Metric::Connect,
        Metric::Redirect,
        Metric::AppConnect,
        Metric::PreTransfer,
        Metric::StartTransfer,
        Metric::Total,
    ];

    /// JSON key of this metric
    pub fn field_name(self) -> &'static str {
        match self {
            Metric::NameLookup => FIELD_NAMELOOKUP,
            Metric::Connect => FIELD_CONNECT,
            Metric::Redirect => FIELD_REDIRECT,
            Metric::AppConnect => FIELD_APPCONNECT,
            Metric::PreTransfer => FIELD_PRETRANSFER,
            Metric::StartTransfer => FIELD_STARTTRANSFER,
            Metric::PostTransfer => FIELD_POSTTRANSFER,
            Metric::Total => FIELD_TOTAL,
        }
    }

    /// Look up a metric by its JSON key
    pub fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.field_name() == name)
    }

    pub fn is_required(self) -> bool {
        self != Metric::PostTransfer
    }

    /// Read this metric from a record
    ///
    /// Returns `None` only for `PostTransfer` on records without it.
    pub fn value(self, record: &TimingRecord) -> Option<f64> {
        match self {
            Metric::NameLookup => Some(record.time_namelookup),
            Metric::Connect => Some(record.time_connect),
            Metric::Redirect => Some(record.time_redirect),
            Metric::AppConnect => Some(record.time_appconnect),
            Metric::PreTransfer => Some(record.time_pretransfer),
            Metric::StartTransfer => Some(record.time_starttransfer),
            Metric::PostTransfer => record.time_posttransfer,
            Metric::Total => Some(record.time_total),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Field layout shared by every record of a dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSchema {
    /// Metrics to aggregate, in first-record key order
    pub metrics: Vec<Metric>,

    /// Whether `time_posttransfer` is present
    pub has_posttransfer: bool,

    /// Whether `time_offset` is present
    pub has_offset: bool,
}

impl DatasetSchema {
    /// Derive the schema from an already-typed record
    ///
    /// Typed records carry no key order, so metrics come out in canonical order.
    pub fn from_record(record: &TimingRecord) -> Self {
        let has_posttransfer = record.time_posttransfer.is_some();
        let metrics = Metric::ALL
            .into_iter()
            .filter(|m| m.is_required() || has_posttransfer)
            .collect();

        Self {
            metrics,
            has_posttransfer,
            has_offset: record.time_offset.is_some(),
        }
    }
}

/// Validate raw JSON records and determine the dataset schema
///
/// **Public** - runs before both aggregation and reconstruction
///
/// Only the first record is inspected.
///
/// # Errors
/// * `ValidationError::EmptyDataset` - No records at all
/// * `ValidationError::MissingFields` - Required fields absent from the first record
pub fn validate_schema(records: &[Map<String, Value>]) -> Result<DatasetSchema, ValidationError> {
    let first = records.first().ok_or(ValidationError::EmptyDataset)?;

    let missing: Vec<String> = Metric::REQUIRED
        .iter()
        .filter(|m| !has_value(first, m.field_name()))
        .map(|m| m.field_name().to_string())
        .collect();

    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    let metrics: Vec<Metric> = first
        .iter()
        .filter(|(key, value)| key.as_str() != FIELD_OFFSET && !value.is_null())
        .filter_map(|(key, _)| {
            let metric = Metric::from_field_name(key);
            if metric.is_none() {
                debug!("Ignoring unknown field '{}'", key);
            }
            metric
        })
        .collect();

    let schema = DatasetSchema {
        metrics,
        has_posttransfer: has_value(first, FIELD_POSTTRANSFER),
        has_offset: has_value(first, FIELD_OFFSET),
    };

    debug!(
        "Schema: {} metrics, posttransfer={}, offset={}",
        schema.metrics.len(),
        schema.has_posttransfer,
        schema.has_offset
    );

    Ok(schema)
}

/// A key counts as present only when it holds a non-null value
fn has_value(record: &Map<String, Value>, key: &str) -> bool {
    record.get(key).is_some_and(|v| !v.is_null())
}
