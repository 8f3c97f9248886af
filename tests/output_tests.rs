use curl_metrics::aggregator::StartOffsetMode;
use curl_metrics::commands::analyze_records;
use curl_metrics::output::{read_report, render_summary, validate_path, write_report};
use curl_metrics::parser::parse_records;
use curl_metrics::utils::config::{AnalysisConfig, DEFAULT_TITLE};
use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::NamedTempFile;

fn fixture_report() -> curl_metrics::output::Report {
    let records = parse_records(include_str!("fixtures/requests.json")).unwrap();
    analyze_records(
        &records,
        &AnalysisConfig::default(),
        Some("requests.json".to_string()),
    )
    .unwrap()
}

#[test]
fn test_report_contents() {
    let report = fixture_report();

    assert_eq!(report.title, DEFAULT_TITLE);
    assert_eq!(report.record_count, 3);
    assert_eq!(report.start_offset_mode, StartOffsetMode::Zero);
    assert_eq!(report.statistics.len(), 7);
    assert_eq!(report.timelines.len(), 3);
    assert!(!report.has_posttransfer);
}

#[test]
fn test_write_and_read_report() {
    let report = fixture_report();
    let temp_file = NamedTempFile::new().unwrap();

    write_report(&report, temp_file.path()).unwrap();
    let loaded = read_report(temp_file.path()).unwrap();

    assert_eq!(loaded.version, report.version);
    assert_eq!(loaded.record_count, report.record_count);
    assert_eq!(loaded.statistics.len(), report.statistics.len());
    assert_eq!(loaded.timelines.len(), report.timelines.len());
}

#[test]
fn test_summary_mentions_every_metric() {
    let report = fixture_report();
    let summary = render_summary(&report, 2);

    for entry in &report.statistics {
        assert!(summary.contains(entry.metric.field_name()));
    }
    assert!(summary.contains("Requests: 3"));
    assert!(summary.contains("... 1 more requests"));
}

#[test]
fn test_validate_output_path_empty() {
    assert!(validate_path(Path::new("")).is_err());
}

#[test]
fn test_validate_output_path_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    assert!(validate_path(temp_dir.path()).is_err());
}
