//! # Series Loader
//!
//! Reads one run's sample file and turns it into a validated [`Run`].
//!
//! The file is a JSON array of objects. Each object carries a `timestamp`
//! (ISO-8601) and some of the metric fields listed in [`Metric`]. Unknown keys
//! are ignored, a `null` value counts as absent.
//!
//! Which metric fields are mandatory depends on the caller: resource charts
//! need `cpu_usage` and `memory_usage_mb`, throughput charts need the message
//! rates. The timestamp is always mandatory.
//!
//! Reading the source is the only side effect.

use crate::error::AnalysisError;
use crate::metrics::Metric;
use crate::samples::{parse_timestamp, Run, RunConfig, SampleRecord};
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

const TIMESTAMP_FIELD: &str = "timestamp";

/// Record as decoded from the file, before any validation
#[derive(Debug, Deserialize)]
struct RawSample {
    timestamp: Option<String>,
    cpu_usage: Option<f64>,
    memory_usage_mb: Option<f64>,
    messages_sent_count: Option<f64>,
    messages_received_count: Option<f64>,
    message_sent_throughput: Option<f64>,
    message_received_throughput: Option<f64>,
}

impl RawSample {
    fn into_record(
        self,
        index: usize,
        source_name: &str,
        required: &[Metric],
    ) -> Result<SampleRecord, AnalysisError> {
        let raw_ts = self
            .timestamp
            .ok_or_else(|| AnalysisError::missing_field(TIMESTAMP_FIELD, index))?;
        let timestamp = parse_timestamp(&raw_ts).ok_or_else(|| {
            AnalysisError::malformed(
                source_name,
                format!("record {} has an unparseable timestamp {:?}", index, raw_ts),
            )
        })?;

        let record = SampleRecord {
            timestamp,
            cpu_usage: self.cpu_usage,
            memory_usage_mb: self.memory_usage_mb,
            messages_sent_count: self.messages_sent_count,
            messages_received_count: self.messages_received_count,
            message_sent_throughput: self.message_sent_throughput,
            message_received_throughput: self.message_received_throughput,
        };

        for &metric in required {
            record.require(metric, index)?;
        }

        Ok(record)
    }
}

/// Decode a run from in-memory JSON content
///
/// `source_name` only appears in error messages.
pub fn parse_run(
    content: &str,
    source_name: &str,
    config: RunConfig,
    required: &[Metric],
) -> Result<Run, AnalysisError> {
    let raw: Vec<RawSample> = serde_json::from_str(content)
        .map_err(|e| AnalysisError::malformed(source_name, e.to_string()))?;

    if raw.is_empty() {
        return Err(AnalysisError::malformed(
            source_name,
            "sample sequence is empty",
        ));
    }

    let records = raw
        .into_iter()
        .enumerate()
        .map(|(index, sample)| sample.into_record(index, source_name, required))
        .collect::<Result<Vec<_>, _>>()?;

    Run::new(config, records).map_err(|e| match e {
        AnalysisError::MalformedInput { reason, .. } => {
            AnalysisError::malformed(source_name, reason)
        }
        other => other,
    })
}

/// Load a run from a sample file on disk
///
/// A file that does not exist means the run was never collected and is
/// reported as `MissingRun`; any other read failure is `MalformedInput`.
pub fn load_run(path: &Path, config: RunConfig, required: &[Metric]) -> Result<Run, AnalysisError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(AnalysisError::missing_run(config.run_size, config.system));
        }
        Err(e) => return Err(AnalysisError::malformed_path(path, e.to_string())),
    };

    let source_name = path.display().to_string();
    let run = parse_run(&content, &source_name, config, required)?;

    debug!(
        "Loaded {} samples for {} from {:?}",
        run.len(),
        run.config(),
        path
    );
    Ok(run)
}
