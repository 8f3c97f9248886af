//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Resolves settings from the config file and CLI overrides
//! 2. Loads and validates the dataset
//! 3. Aggregates per-metric statistics
//! 4. Reconstructs per-request timelines
//! 5. Writes the report and/or prints a summary

use super::models::AnalyzeArgs;
use crate::aggregator::{aggregate, reconstruct, TimelineOptions};
use crate::output::{render_summary, write_report, Report};
use crate::parser::{load_records, RecordSet};
use crate::utils::config::{load_config, AnalysisConfig};
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The generated report
///
/// # Errors
/// * Missing or unreadable dataset
/// * Schema validation failures
/// * Non-monotonic timing under the reject policy
/// * File write errors
pub fn execute_analyze(args: AnalyzeArgs) -> Result<Report> {
    let start_time = Instant::now();

    validate_args(&args)?;

    let config = resolve_config(&args)?;
    let dataset = args
        .dataset_path()
        .context("No dataset path after validation")?;

    info!("Step 1/4: Loading dataset {}...", dataset.display());
    let records = load_records(dataset)
        .with_context(|| format!("Failed to load dataset {}", dataset.display()))?;

    info!("Step 2/4: Analyzing {} requests...", records.len());
    let report = analyze_records(&records, &config, Some(dataset.display().to_string()))?;

    info!("Step 3/4: Writing report...");
    if let Some(path) = &args.output_json {
        write_report(&report, path).context("Failed to write report JSON")?;
        info!("✓ Report written to: {}", path.display());
    } else {
        debug!("No report path given, skipping JSON output");
    }

    info!("Step 4/4: Summary");
    if args.print_summary {
        println!("{}", render_summary(&report, args.timeline_rows));
    }

    info!(
        "Analysis completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(report)
}

/// Compute statistics and timelines for a loaded record set
///
/// **Public** - library entry point for callers that load data themselves
pub fn analyze_records(
    records: &RecordSet,
    config: &AnalysisConfig,
    source: Option<String>,
) -> Result<Report> {
    let schema = records.schema();

    let statistics =
        aggregate(records, &schema.metrics).context("Failed to aggregate statistics")?;

    let options = TimelineOptions {
        start_offset_mode: config.timeline.anchor,
        negative_durations: config.timeline.negative_durations,
    };
    let timelines = reconstruct(records, schema.has_posttransfer, &options)
        .context("Failed to reconstruct timelines")?;

    debug!(
        "Computed {} metric summaries and {} timelines",
        statistics.len(),
        timelines.len()
    );

    Ok(Report::new(
        config.title(),
        source,
        schema.has_posttransfer,
        options.start_offset_mode,
        statistics,
        timelines,
    ))
}

/// Merge the config file (if any) with CLI overrides
///
/// **Public** - CLI flags win over file values
pub fn resolve_config(args: &AnalyzeArgs) -> Result<AnalysisConfig> {
    let mut config = match &args.config_path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    if let Some(title) = &args.title {
        config.title = Some(title.clone());
    }
    if let Some(anchor) = args.anchor {
        config.timeline.anchor = anchor;
    }
    if let Some(policy) = args.negative_durations {
        config.timeline.negative_durations = policy;
    }

    Ok(config)
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    let Some(dataset) = args.dataset_path() else {
        anyhow::bail!(
            "No dataset given: pass --file or provide a default dataset via --default-json"
        );
    };

    if !dataset.is_file() {
        anyhow::bail!("Dataset not found: {}", dataset.display());
    }

    if args.output_json.is_none() && !args.print_summary {
        anyhow::bail!("Nothing to do: pass --output and/or --summary");
    }

    if let Some(path) = &args.config_path {
        if !path.is_file() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{NegativeDurationPolicy, StartOffsetMode};
    use std::fs;
    use std::path::PathBuf;

    const DATASET: &str = r#"[
        {"time_namelookup":0.001,"time_connect":0.002,"time_redirect":0,
         "time_appconnect":0.003,"time_pretransfer":0.004,
         "time_starttransfer":0.005,"time_total":0.006,"time_offset":10},
        {"time_namelookup":0.002,"time_connect":0.004,"time_redirect":0,
         "time_appconnect":0.006,"time_pretransfer":0.007,
         "time_starttransfer":0.009,"time_total":0.012,"time_offset":11}
    ]"#;

    fn write_dataset(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("requests.json");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_validate_args_no_dataset() {
        let args = AnalyzeArgs::default();
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_missing_file() {
        let args = AnalyzeArgs {
            input: Some(PathBuf::from("/nonexistent/requests.json")),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_nothing_to_do() {
        let dir = tempfile::tempdir().unwrap();
        let args = AnalyzeArgs {
            input: Some(write_dataset(&dir, DATASET)),
            print_summary: false,
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_falls_back_to_default_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let args = AnalyzeArgs {
            default_input: Some(write_dataset(&dir, DATASET)),
            ..Default::default()
        };
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_resolve_config_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("metrics.toml");
        fs::write(
            &config_path,
            "title = \"File\"\n[timeline]\nanchor = \"earliest\"\n",
        )
        .unwrap();

        let args = AnalyzeArgs {
            config_path: Some(config_path),
            negative_durations: Some(NegativeDurationPolicy::Clamp),
            ..Default::default()
        };

        let config = resolve_config(&args).unwrap();
        assert_eq!(config.title(), "File");
        assert_eq!(config.timeline.anchor, StartOffsetMode::EarliestRequest);
        assert_eq!(
            config.timeline.negative_durations,
            NegativeDurationPolicy::Clamp
        );
    }

    #[test]
    fn test_execute_analyze_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out/report.json");
        let args = AnalyzeArgs {
            input: Some(write_dataset(&dir, DATASET)),
            output_json: Some(output.clone()),
            print_summary: false,
            anchor: Some(StartOffsetMode::EarliestRequest),
            ..Default::default()
        };

        let report = execute_analyze(args).unwrap();

        assert!(output.exists());
        assert_eq!(report.record_count, 2);
        assert_eq!(report.statistics.len(), 7);
        assert_eq!(report.timelines[0].start(), 0.0);
        assert_eq!(report.timelines[1].start(), 1.0);
    }

    #[test]
    fn test_execute_analyze_surfaces_schema_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = AnalyzeArgs {
            input: Some(write_dataset(
                &dir,
                r#"[{"time_namelookup":0.1,"time_total":0.2}]"#,
            )),
            print_summary: false,
            output_json: Some(dir.path().join("report.json")),
            ..Default::default()
        };

        let err = execute_analyze(args).unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("time_connect"));
    }
}
