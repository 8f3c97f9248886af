//! Typed timing records and dataset loading.
//!
//! A dataset is a JSON array of flat objects, one per request, as produced by
//! `curl --write-out '%{json}'` filtered to its `time_*` fields.

use super::schema::{validate_schema, DatasetSchema};
use crate::utils::config::FIELD_POSTTRANSFER;
use crate::utils::error::{ParseError, ValidationError};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// One request's cumulative timing sample, in seconds
///
/// Every field is measured from the start of the request, except
/// `time_redirect`, which is `0` when no redirect happened, and
/// `time_offset`, which is the request's start within the session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingRecord {
    pub time_namelookup: f64,
    pub time_connect: f64,
    pub time_redirect: f64,
    pub time_appconnect: f64,
    pub time_pretransfer: f64,
    pub time_starttransfer: f64,
    pub time_total: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_posttransfer: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_offset: Option<f64>,
}

/// Ordered, immutable collection of records sharing one schema
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    records: Vec<TimingRecord>,
    schema: DatasetSchema,
}

impl RecordSet {
    /// Build a record set from typed records
    ///
    /// The schema is derived from the first record.
    pub fn from_records(records: Vec<TimingRecord>) -> Result<Self, ValidationError> {
        let first = records.first().ok_or(ValidationError::EmptyDataset)?;
        let schema = DatasetSchema::from_record(first);
        check_consistency(&records, &schema)?;
        Ok(Self { records, schema })
    }

    /// Build a record set from decoded JSON
    ///
    /// **Public** - main entry point for raw input
    ///
    /// # Errors
    /// * `ParseError::InvalidFormat` - Not an array of objects
    /// * `ParseError::Validation` - Empty dataset or missing required fields
    /// * `ParseError::InvalidRecord` - A record failed typed decoding
    pub fn from_json(value: Value) -> Result<Self, ParseError> {
        let Value::Array(items) = value else {
            return Err(ParseError::InvalidFormat(
                "Dataset must be a JSON array of objects".to_string(),
            ));
        };

        let objects = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(map) => Ok(map),
                other => Err(ParseError::InvalidFormat(format!(
                    "Record {} is not a JSON object: {}",
                    index, other
                ))),
            })
            .collect::<Result<Vec<Map<String, Value>>, ParseError>>()?;

        let schema = validate_schema(&objects)?;

        let records = objects
            .into_iter()
            .enumerate()
            .map(|(index, map)| {
                serde_json::from_value::<TimingRecord>(Value::Object(map))
                    .map_err(|source| ParseError::InvalidRecord { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        check_consistency(&records, &schema)?;

        debug!("Decoded {} records", records.len());

        Ok(Self { records, schema })
    }

    pub fn records(&self) -> &[TimingRecord] {
        &self.records
    }

    pub fn schema(&self) -> &DatasetSchema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimingRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a TimingRecord;
    type IntoIter = std::slice::Iter<'a, TimingRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Every record must carry `time_posttransfer` when the schema declares it,
/// since the stage layout is decided once for the whole dataset
fn check_consistency(
    records: &[TimingRecord],
    schema: &DatasetSchema,
) -> Result<(), ValidationError> {
    if !schema.has_posttransfer {
        return Ok(());
    }

    match records.iter().position(|r| r.time_posttransfer.is_none()) {
        Some(index) => Err(ValidationError::InconsistentRecord {
            index,
            field: FIELD_POSTTRANSFER.to_string(),
        }),
        None => Ok(()),
    }
}

/// Parse a dataset from a JSON string
pub fn parse_records(raw: &str) -> Result<RecordSet, ParseError> {
    let value: Value = serde_json::from_str(raw)?;
    RecordSet::from_json(value)
}

/// Load a dataset from a JSON file
///
/// **Public** - used by the analyze and validate commands
pub fn load_records(input_path: impl AsRef<Path>) -> Result<RecordSet, ParseError> {
    let input_path = input_path.as_ref();

    info!("Loading dataset from: {}", input_path.display());

    let file = File::open(input_path)?;
    let value: Value = serde_json::from_reader(BufReader::new(file))?;
    let record_set = RecordSet::from_json(value)?;

    info!("Loaded {} records", record_set.len());

    Ok(record_set)
}
