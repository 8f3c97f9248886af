//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors raised while establishing the dataset schema
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required timing fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Dataset contains no records")]
    EmptyDataset,

    #[error("Record {index} lacks field {field} declared by the first record")]
    InconsistentRecord { index: usize, field: String },
}

/// Errors that can occur during statistics aggregation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    #[error("No values to aggregate for metric {0}")]
    EmptySeries(String),

    #[error("Record {index} has no value for metric {metric}")]
    MissingValue { metric: String, index: usize },
}

/// Errors that can occur during timeline reconstruction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimelineError {
    #[error("Non-monotonic timing in record {record_index}: stage '{stage}' has negative duration {duration}")]
    NonMonotonicTiming {
        record_index: usize,
        stage: String,
        duration: f64,
    },
}

/// Errors that can occur while decoding timing records
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to read dataset: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid dataset format: {0}")]
    InvalidFormat(String),

    #[error("Invalid record at index {index}: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur while loading the analysis config
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config TOML parse error: {0}")]
    ParseFailed(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_message_lists_names() {
        let err = ValidationError::MissingFields(vec![
            "time_connect".to_string(),
            "time_total".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Missing required timing fields: time_connect, time_total"
        );
    }

    #[test]
    fn test_non_monotonic_message() {
        let err = TimelineError::NonMonotonicTiming {
            record_index: 3,
            stage: "Connection".to_string(),
            duration: -0.5,
        };
        let msg = err.to_string();
        assert!(msg.contains("record 3"));
        assert!(msg.contains("Connection"));
    }

    #[test]
    fn test_missing_value_message() {
        let err = StatsError::MissingValue {
            metric: "time_posttransfer".to_string(),
            index: 0,
        };
        assert_eq!(
            err.to_string(),
            "Record 0 has no value for metric time_posttransfer"
        );
    }
}
