//! Descriptive statistics per timing metric.
//!
//! Every metric of the dataset schema becomes a series of per-request values,
//! which is then reduced to mean/min/max and sample variance.

use crate::parser::{Metric, RecordSet};
use crate::utils::error::StatsError;
use log::debug;
use serde::{Deserialize, Serialize};

/// Per-request values of one metric, in record order
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    pub metric: Metric,
    pub values: Vec<f64>,
}

/// Summary statistics over a metric series
///
/// `variance` and `stdev` use the sample (n - 1) definition and are `0`
/// for fewer than two values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricStatistics {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub variance: f64,
    pub stdev: f64,
}

/// One entry of the ordered statistics mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub metric: Metric,

    #[serde(flatten)]
    pub statistics: MetricStatistics,

    /// Per-request values, index-aligned with the record set
    pub values: Vec<f64>,
}

impl MetricSeries {
    /// Extract a metric from every record, index-aligned with the set
    ///
    /// # Errors
    /// * `StatsError::MissingValue` - A record does not carry the metric
    pub fn from_records(metric: Metric, records: &RecordSet) -> Result<Self, StatsError> {
        let values = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                metric.value(record).ok_or_else(|| StatsError::MissingValue {
                    metric: metric.to_string(),
                    index,
                })
            })
            .collect::<Result<Vec<f64>, StatsError>>()?;

        Ok(Self { metric, values })
    }

    /// Compute statistics over the series
    ///
    /// # Errors
    /// * `StatsError::EmptySeries` - The series holds no values
    pub fn statistics(&self) -> Result<MetricStatistics, StatsError> {
        MetricStatistics::from_values(&self.values)
            .ok_or_else(|| StatsError::EmptySeries(self.metric.to_string()))
    }

    /// Reduce the series into a summary entry, keeping its values
    pub fn summarize(self) -> Result<MetricSummary, StatsError> {
        let statistics = self.statistics()?;
        Ok(MetricSummary {
            metric: self.metric,
            statistics,
            values: self.values,
        })
    }
}

impl MetricStatistics {
    /// Statistics over a slice of values, `None` when empty
    ///
    /// Sums run over a sorted copy, so the result does not depend on the
    /// order of `values`.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let (&min, &max) = (sorted.first()?, sorted.last()?);
        let count = sorted.len() as f64;
        let mean = sorted.iter().sum::<f64>() / count;

        let variance = if sorted.len() < 2 {
            0.0
        } else {
            sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1.0)
        };

        Some(Self {
            mean,
            min,
            max,
            variance,
            stdev: variance.sqrt(),
        })
    }
}

/// Aggregate statistics for each metric over the record set
///
/// **Public** - main entry point for statistics
///
/// # Arguments
/// * `records` - Validated record set
/// * `metrics` - Metrics to aggregate, usually `records.schema().metrics`
///
/// # Returns
/// One summary per metric, in the order of `metrics`
pub fn aggregate(
    records: &RecordSet,
    metrics: &[Metric],
) -> Result<Vec<MetricSummary>, StatsError> {
    debug!(
        "Aggregating {} metrics over {} records",
        metrics.len(),
        records.len()
    );

    metrics
        .iter()
        .map(|&metric| MetricSeries::from_records(metric, records)?.summarize())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::TimingRecord;

    fn record(total: f64) -> TimingRecord {
        TimingRecord {
            time_namelookup: 0.01,
            time_connect: 0.02,
            time_redirect: 0.0,
            time_appconnect: 0.03,
            time_pretransfer: 0.04,
            time_starttransfer: 0.05,
            time_total: total,
            time_posttransfer: None,
            time_offset: None,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_statistics_basic() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = MetricStatistics::from_values(&values).unwrap();

        assert_close(stats.mean, 5.0);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
        // sum of squared deviations is 32, over n - 1 = 7
        assert_close(stats.variance, 32.0 / 7.0);
        assert_close(stats.stdev, (32.0f64 / 7.0).sqrt());
    }

    #[test]
    fn test_single_value_has_zero_variance() {
        let stats = MetricStatistics::from_values(&[0.25]).unwrap();

        assert_eq!(stats.mean, 0.25);
        assert_eq!(stats.min, 0.25);
        assert_eq!(stats.max, 0.25);
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.stdev, 0.0);
    }

    #[test]
    fn test_empty_values() {
        assert!(MetricStatistics::from_values(&[]).is_none());
    }

    #[test]
    fn test_empty_series_error() {
        let series = MetricSeries {
            metric: Metric::PostTransfer,
            values: Vec::new(),
        };
        assert_eq!(
            series.statistics(),
            Err(StatsError::EmptySeries("time_posttransfer".to_string()))
        );
    }

    #[test]
    fn test_aggregate_preserves_metric_order() {
        let set = RecordSet::from_records(vec![record(0.1), record(0.3)]).unwrap();
        let metrics = [Metric::Total, Metric::NameLookup];

        let summaries = aggregate(&set, &metrics).unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].metric, Metric::Total);
        assert_eq!(summaries[1].metric, Metric::NameLookup);
        assert_close(summaries[0].statistics.mean, 0.2);
        assert_eq!(summaries[0].values, vec![0.1, 0.3]);
    }

    #[test]
    fn test_aggregate_missing_posttransfer() {
        let set = RecordSet::from_records(vec![record(0.1)]).unwrap();
        let result = aggregate(&set, &[Metric::PostTransfer]);
        assert_eq!(
            result,
            Err(StatsError::MissingValue {
                metric: "time_posttransfer".to_string(),
                index: 0,
            })
        );
    }

    #[test]
    fn test_series_rejects_partial_posttransfer() {
        // the first record decides the schema, so a later posttransfer is not declared
        let mut later = record(0.3);
        later.time_posttransfer = Some(0.045);
        let set = RecordSet::from_records(vec![record(0.1), later]).unwrap();

        assert!(!set.schema().metrics.contains(&Metric::PostTransfer));
        assert_eq!(
            MetricSeries::from_records(Metric::PostTransfer, &set),
            Err(StatsError::MissingValue {
                metric: "time_posttransfer".to_string(),
                index: 0,
            })
        );
    }

    #[test]
    fn test_statistics_independent_of_value_order() {
        let forward = MetricStatistics::from_values(&[0.1, 0.2, 0.3]).unwrap();
        let reversed = MetricStatistics::from_values(&[0.3, 0.2, 0.1]).unwrap();
        let shuffled = MetricStatistics::from_values(&[0.2, 0.3, 0.1]).unwrap();

        assert_eq!(forward, reversed);
        assert_eq!(forward, shuffled);
    }
}
