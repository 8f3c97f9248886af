//! Configuration and constants for the CLI.

use crate::aggregator::timeline::{NegativeDurationPolicy, StartOffsetMode};
use crate::utils::error::ConfigError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Default title used in reports and summaries
pub const DEFAULT_TITLE: &str = "Curl Metrics";

/// Environment variable holding the default dataset path
pub const DEFAULT_DATASET_ENV: &str = "CURL_METRICS_DEFAULT_JSON";

/// Timeline rows printed in the text summary before truncating
pub const SUMMARY_TIMELINE_ROWS: usize = 10;

// Field names as emitted by curl's --write-out JSON
pub const FIELD_NAMELOOKUP: &str = "time_namelookup";
pub const FIELD_CONNECT: &str = "time_connect";
pub const FIELD_REDIRECT: &str = "time_redirect";
pub const FIELD_APPCONNECT: &str = "time_appconnect";
pub const FIELD_PRETRANSFER: &str = "time_pretransfer";
pub const FIELD_STARTTRANSFER: &str = "time_starttransfer";
pub const FIELD_POSTTRANSFER: &str = "time_posttransfer";
pub const FIELD_TOTAL: &str = "time_total";
pub const FIELD_OFFSET: &str = "time_offset";

/// Analysis settings, loadable from a TOML file
///
/// ```toml
/// title = "Staging API"
///
/// [timeline]
/// anchor = "earliest"
/// negative_durations = "clamp"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Title carried into the report and summary
    #[serde(default)]
    pub title: Option<String>,

    /// Timeline reconstruction settings
    #[serde(default)]
    pub timeline: TimelineConfig,
}

/// Timeline reconstruction settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimelineConfig {
    #[serde(default)]
    pub anchor: StartOffsetMode,

    #[serde(default)]
    pub negative_durations: NegativeDurationPolicy,
}

impl AnalysisConfig {
    /// Title to use, falling back to the default
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }
}

/// Load analysis settings from a TOML file
///
/// # Errors
/// * `ConfigError::IoError` - If file cannot be read
/// * `ConfigError::ParseFailed` - If TOML is invalid
pub fn load_config(path: impl AsRef<Path>) -> Result<AnalysisConfig, ConfigError> {
    let path = path.as_ref();
    debug!("Loading config from: {}", path.display());

    let contents = fs::read_to_string(path)?;
    let config: AnalysisConfig = toml::from_str(&contents)?;
    Ok(config)
}
