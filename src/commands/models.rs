use crate::aggregator::{NegativeDurationPolicy, StartOffsetMode};
use crate::utils::config::SUMMARY_TIMELINE_ROWS;
use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Dataset given explicitly
    pub input: Option<PathBuf>,

    /// Fallback dataset when `input` is not given
    pub default_input: Option<PathBuf>,

    /// Output path for the JSON report (optional)
    pub output_json: Option<PathBuf>,

    /// Print text summary to stdout
    pub print_summary: bool,

    /// TOML config file (optional)
    pub config_path: Option<PathBuf>,

    /// Title override
    pub title: Option<String>,

    /// Timeline anchor override
    pub anchor: Option<StartOffsetMode>,

    /// Negative duration handling override
    pub negative_durations: Option<NegativeDurationPolicy>,

    /// Timelines listed in the text summary
    pub timeline_rows: usize,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input: None,
            default_input: None,
            output_json: None,
            print_summary: true,
            config_path: None,
            title: None,
            anchor: None,
            negative_durations: None,
            timeline_rows: SUMMARY_TIMELINE_ROWS,
        }
    }
}

impl AnalyzeArgs {
    /// Explicit input first, then the default dataset
    pub fn dataset_path(&self) -> Option<&PathBuf> {
        self.input.as_ref().or(self.default_input.as_ref())
    }
}
