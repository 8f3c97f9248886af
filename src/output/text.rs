//! Plain-text summaries for the terminal.

use super::report::Report;
use crate::aggregator::{MetricSummary, RequestTimeline};
use colored::Colorize;
use std::fmt::Write;

/// Render the statistics table
///
/// One row per metric, in the given order, with Mean/Min/Max/Variance/Stdev columns.
pub fn render_statistics_table(statistics: &[MetricSummary]) -> String {
    let name_width = statistics
        .iter()
        .map(|s| s.metric.field_name().len())
        .max()
        .unwrap_or(0)
        .max("Metric".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<name_width$}  {:>12}  {:>12}  {:>12}  {:>14}  {:>12}",
        "Metric", "Mean", "Min", "Max", "Variance", "Stdev",
    );

    for summary in statistics {
        let s = &summary.statistics;
        let _ = writeln!(
            out,
            "{:<name_width$}  {:>12.6}  {:>12.6}  {:>12.6}  {:>14.9}  {:>12.6}",
            summary.metric.field_name(),
            s.mean,
            s.min,
            s.max,
            s.variance,
            s.stdev,
        );
    }

    out
}

/// Render up to `limit` request timelines, one stage per line
pub fn render_timelines(timelines: &[RequestTimeline], limit: usize) -> String {
    let mut out = String::new();

    for timeline in timelines.iter().take(limit) {
        let _ = writeln!(
            out,
            "[{}] start {:.6}s, elapsed {:.6}s",
            timeline.index,
            timeline.start(),
            timeline.elapsed()
        );
        for interval in &timeline.stages {
            let _ = writeln!(
                out,
                "    {:<24} {:>12.6} +{:.6}",
                interval.stage.label(),
                interval.start,
                interval.duration
            );
        }
    }

    if timelines.len() > limit {
        let _ = writeln!(out, "... {} more requests", timelines.len() - limit);
    }

    out
}

/// Render the full report summary
pub fn render_summary(report: &Report, timeline_limit: usize) -> String {
    let rule = "=".repeat(80);
    let mut out = String::new();

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "{}", report.title.to_uppercase().bold());
    let _ = writeln!(out, "{}", rule);
    if let Some(source) = &report.source {
        let _ = writeln!(out, "Source:   {}", source);
    }
    let _ = writeln!(out, "Requests: {}", report.record_count);
    if let Some((start, end)) = report.time_span() {
        let _ = writeln!(out, "Span:     {:.6}s .. {:.6}s", start, end);
    }

    let _ = writeln!(out, "\n{}", "Statistics".cyan().bold());
    out.push_str(&render_statistics_table(&report.statistics));

    let _ = writeln!(out, "\n{}", "Timeline".cyan().bold());
    out.push_str(&render_timelines(&report.timelines, timeline_limit));
    let _ = writeln!(out, "{}", rule);

    out
}
