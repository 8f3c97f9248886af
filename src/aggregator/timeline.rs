//! Reconstruction of per-request phase timelines.
//!
//! curl reports cumulative checkpoints measured from the start of each
//! request. Successive differences of those checkpoints give the duration of
//! each phase, and laying the phases end to end from the request's offset
//! gives a contiguous timeline suitable for Gantt-style charts.

use crate::parser::{RecordSet, TimingRecord};
use crate::utils::error::TimelineError;
use clap::ValueEnum;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A discrete phase of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    #[serde(rename = "DNS Lookup")]
    DnsLookup,
    #[serde(rename = "Connection")]
    Connection,
    #[serde(rename = "Redirect")]
    Redirect,
    #[serde(rename = "SSL Handshake")]
    SslHandshake,
    #[serde(rename = "Request Preparation")]
    RequestPreparation,
    #[serde(rename = "Time To First Byte")]
    TimeToFirstByte,
    #[serde(rename = "Time To Last Byte Sent")]
    TimeToLastByteSent,
    #[serde(rename = "End")]
    End,
}

impl Stage {
    /// Stage layout for datasets without `time_posttransfer`
    pub const BASIC: [Stage; 7] = [
        Stage::DnsLookup,
        Stage::Connection,
        Stage::Redirect,
        Stage::SslHandshake,
        Stage::RequestPreparation,
        Stage::TimeToFirstByte,
        Stage::End,
    ];

    /// Stage layout for datasets with `time_posttransfer`
    pub const WITH_POSTTRANSFER: [Stage; 8] = [
        Stage::DnsLookup,
        Stage::Connection,
        Stage::Redirect,
        Stage::SslHandshake,
        Stage::RequestPreparation,
        Stage::TimeToFirstByte,
        Stage::TimeToLastByteSent,
        Stage::End,
    ];

    pub fn layout(has_posttransfer: bool) -> &'static [Stage] {
        if has_posttransfer {
            &Self::WITH_POSTTRANSFER
        } else {
            &Self::BASIC
        }
    }

    /// Human-readable stage name
    pub fn label(self) -> &'static str {
        match self {
            Stage::DnsLookup => "DNS Lookup",
            Stage::Connection => "Connection",
            Stage::Redirect => "Redirect",
            Stage::SslHandshake => "SSL Handshake",
            Stage::RequestPreparation => "Request Preparation",
            Stage::TimeToFirstByte => "Time To First Byte",
            Stage::TimeToLastByteSent => "Time To Last Byte Sent",
            Stage::End => "End",
        }
    }

    /// Cumulative checkpoint at which this stage completes
    fn checkpoint(self, record: &TimingRecord) -> f64 {
        match self {
            Stage::DnsLookup => record.time_namelookup,
            Stage::Connection => record.time_connect,
            Stage::Redirect => effective_redirect(record),
            Stage::SslHandshake => record.time_appconnect,
            Stage::RequestPreparation => record.time_pretransfer,
            Stage::TimeToFirstByte => record.time_starttransfer,
            // Nothing uploaded after the first byte when the field is absent
            Stage::TimeToLastByteSent => record
                .time_posttransfer
                .unwrap_or(record.time_starttransfer),
            Stage::End => record.time_total,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reference point subtracted from every request offset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum StartOffsetMode {
    /// Offsets are used as-is
    #[default]
    #[serde(rename = "zero")]
    #[value(name = "zero")]
    Zero,

    /// The earliest request starts at 0
    #[serde(rename = "earliest")]
    #[value(name = "earliest")]
    EarliestRequest,
}

/// What to do with a phase whose duration comes out negative
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NegativeDurationPolicy {
    /// Fail with `TimelineError::NonMonotonicTiming`
    #[default]
    Reject,

    /// Replace the duration with 0 and log a warning
    Clamp,
}

/// Reconstruction settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimelineOptions {
    pub start_offset_mode: StartOffsetMode,
    pub negative_durations: NegativeDurationPolicy,
}

/// One phase placed on the session time axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageInterval {
    pub stage: Stage,
    pub start: f64,
    pub duration: f64,
}

impl StageInterval {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Contiguous phases of one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestTimeline {
    /// Position of the request in the record set
    pub index: usize,
    pub stages: Vec<StageInterval>,
}

impl RequestTimeline {
    /// Start of the first stage
    pub fn start(&self) -> f64 {
        self.stages.first().map_or(0.0, |s| s.start)
    }

    /// End of the last stage
    pub fn end(&self) -> f64 {
        self.stages.last().map_or(0.0, StageInterval::end)
    }

    /// Sum of stage durations
    pub fn elapsed(&self) -> f64 {
        self.stages.iter().map(|s| s.duration).sum()
    }

    pub fn stage(&self, stage: Stage) -> Option<&StageInterval> {
        self.stages.iter().find(|s| s.stage == stage)
    }
}

/// Reconstruct the phase timeline of every record
///
/// **Public** - main entry point for timeline reconstruction
///
/// # Arguments
/// * `records` - Validated record set
/// * `has_posttransfer` - Stage layout switch, usually `records.schema().has_posttransfer`
/// * `options` - Offset anchoring and negative-duration handling
///
/// # Errors
/// * `TimelineError::NonMonotonicTiming` - A phase has negative duration under
///   `NegativeDurationPolicy::Reject`
pub fn reconstruct(
    records: &RecordSet,
    has_posttransfer: bool,
    options: &TimelineOptions,
) -> Result<Vec<RequestTimeline>, TimelineError> {
    let base = session_origin(records, options.start_offset_mode);

    debug!(
        "Reconstructing {} timelines ({} stages, origin {})",
        records.len(),
        Stage::layout(has_posttransfer).len(),
        base
    );

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            reconstruct_record(
                index,
                record,
                has_posttransfer,
                base,
                options.negative_durations,
            )
        })
        .collect()
}

/// Reconstruct a single record's timeline
///
/// `base` is subtracted from the record's offset to place its first stage.
pub fn reconstruct_record(
    index: usize,
    record: &TimingRecord,
    has_posttransfer: bool,
    base: f64,
    policy: NegativeDurationPolicy,
) -> Result<RequestTimeline, TimelineError> {
    let layout = Stage::layout(has_posttransfer);
    if has_posttransfer && record.time_posttransfer.is_none() {
        debug!(
            "Record {}: no time_posttransfer, 'Time To Last Byte Sent' is empty",
            index
        );
    }

    let mut stages = Vec::with_capacity(layout.len());

    let mut start = record.time_offset.unwrap_or(0.0) - base;
    let mut previous = 0.0;

    for &stage in layout {
        let checkpoint = stage.checkpoint(record);
        let duration = check_duration(index, stage, checkpoint - previous, policy)?;

        stages.push(StageInterval {
            stage,
            start,
            duration,
        });

        start += duration;
        // a clamped checkpoint is not counted again by the next stage
        previous = f64::max(previous, checkpoint);
    }

    Ok(RequestTimeline { index, stages })
}

/// Offset that maps to 0 on the session axis
fn session_origin(records: &RecordSet, mode: StartOffsetMode) -> f64 {
    match mode {
        StartOffsetMode::Zero => 0.0,
        StartOffsetMode::EarliestRequest => records
            .iter()
            .map(|r| r.time_offset.unwrap_or(0.0))
            .fold(f64::INFINITY, f64::min),
    }
}

/// `time_redirect` is 0 when no redirect happened; treat that as completing
/// together with the connection so the Redirect phase is empty
fn effective_redirect(record: &TimingRecord) -> f64 {
    if record.time_redirect == 0.0 {
        record.time_connect
    } else {
        record.time_redirect
    }
}

fn check_duration(
    index: usize,
    stage: Stage,
    duration: f64,
    policy: NegativeDurationPolicy,
) -> Result<f64, TimelineError> {
    if duration >= 0.0 {
        return Ok(duration);
    }

    match policy {
        NegativeDurationPolicy::Reject => Err(TimelineError::NonMonotonicTiming {
            record_index: index,
            stage: stage.label().to_string(),
            duration,
        }),
        NegativeDurationPolicy::Clamp => {
            warn!(
                "Record {}: clamping negative '{}' duration {} to 0",
                index, stage, duration
            );
            Ok(0.0)
        }
    }
}
