//! # Sample Records and Runs
//!
//! A [`SampleRecord`] is one observation taken by the resource monitor: a
//! timestamp plus CPU, memory and (optionally) message counters. A [`Run`]
//! is the ordered, non-empty sequence of records collected for one system
//! under one configuration.
//!
//! ## Invariants
//!
//! - A run is never empty; its first record defines t=0.
//! - Timestamps within a run are non-decreasing.
//! - Every present metric value is finite and non-negative.
//!
//! These are checked once by [`Run::new`], so the normalizer and aggregator
//! can rely on them.

use crate::error::AnalysisError;
use crate::metrics::Metric;
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One observation of a monitored process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub timestamp: DateTime<FixedOffset>,
    pub cpu_usage: Option<f64>,
    pub memory_usage_mb: Option<f64>,
    pub messages_sent_count: Option<f64>,
    pub messages_received_count: Option<f64>,
    pub message_sent_throughput: Option<f64>,
    pub message_received_throughput: Option<f64>,
}

impl SampleRecord {
    /// A record with only a timestamp; metric values are filled in by the caller
    pub fn new(timestamp: DateTime<FixedOffset>) -> Self {
        Self {
            timestamp,
            cpu_usage: None,
            memory_usage_mb: None,
            messages_sent_count: None,
            messages_received_count: None,
            message_sent_throughput: None,
            message_received_throughput: None,
        }
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::CpuUsage => self.cpu_usage,
            Metric::MemoryUsageMb => self.memory_usage_mb,
            Metric::MessagesSentCount => self.messages_sent_count,
            Metric::MessagesReceivedCount => self.messages_received_count,
            Metric::MessageSentThroughput => self.message_sent_throughput,
            Metric::MessageReceivedThroughput => self.message_received_throughput,
        }
    }

    pub fn with_value(mut self, metric: Metric, value: f64) -> Self {
        let slot = match metric {
            Metric::CpuUsage => &mut self.cpu_usage,
            Metric::MemoryUsageMb => &mut self.memory_usage_mb,
            Metric::MessagesSentCount => &mut self.messages_sent_count,
            Metric::MessagesReceivedCount => &mut self.messages_received_count,
            Metric::MessageSentThroughput => &mut self.message_sent_throughput,
            Metric::MessageReceivedThroughput => &mut self.message_received_throughput,
        };
        *slot = Some(value);
        self
    }

    /// Value of `metric` for the record at `index`, or `MissingField`
    pub fn require(&self, metric: Metric, index: usize) -> Result<f64, AnalysisError> {
        self.value(metric)
            .ok_or_else(|| AnalysisError::missing_field(metric.field_name(), index))
    }
}

/// Parse an ISO-8601 timestamp
///
/// RFC 3339 timestamps keep their offset. Naive datetimes (no offset) are
/// taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts);
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Identity of a run: which system, which interval setting, how many kernels
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunConfig {
    pub system: String,
    pub interval: String,
    pub run_size: u32,
}

impl RunConfig {
    pub fn new(system: impl Into<String>, interval: impl Into<String>, run_size: u32) -> Self {
        Self {
            system: system.into(),
            interval: interval.into(),
            run_size,
        }
    }
}

impl std::fmt::Display for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} kernels, {}ms)",
            self.system, self.run_size, self.interval
        )
    }
}

/// Ordered, non-empty sample records of one system under one configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Run {
    config: RunConfig,
    records: Vec<SampleRecord>,
}

impl Run {
    /// Build a run, checking the run invariants
    pub fn new(config: RunConfig, records: Vec<SampleRecord>) -> Result<Self, AnalysisError> {
        let source = config.to_string();

        if records.is_empty() {
            return Err(AnalysisError::malformed(source, "run contains no records"));
        }

        for (index, pair) in records.windows(2).enumerate() {
            if pair[1].timestamp < pair[0].timestamp {
                return Err(AnalysisError::malformed(
                    source,
                    format!(
                        "timestamp of record {} ({}) precedes record {} ({})",
                        index + 1,
                        pair[1].timestamp.to_rfc3339(),
                        index,
                        pair[0].timestamp.to_rfc3339()
                    ),
                ));
            }
        }

        for (index, record) in records.iter().enumerate() {
            for metric in Metric::ALL {
                if let Some(value) = record.value(metric) {
                    if !value.is_finite() || value < 0.0 {
                        return Err(AnalysisError::malformed(
                            source,
                            format!(
                                "field `{}` in record {} must be a non-negative number, got {}",
                                metric.field_name(),
                                index,
                                value
                            ),
                        ));
                    }
                }
            }
        }

        Ok(Self { config, records })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn records(&self) -> &[SampleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Timestamp that defines t=0 for this run
    pub fn start(&self) -> DateTime<FixedOffset> {
        self.records[0].timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(raw: &str) -> DateTime<FixedOffset> {
        parse_timestamp(raw).unwrap()
    }

    fn config() -> RunConfig {
        RunConfig::new("zasper", "100", 2)
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let with_offset = ts("2024-11-02T10:00:05+05:30");
        assert_eq!(with_offset.offset().local_minus_utc(), 5 * 3600 + 30 * 60);

        let utc = ts("2024-11-02T10:00:05Z");
        assert_eq!(utc.offset().local_minus_utc(), 0);

        let naive = ts("2024-11-02T10:00:05.250");
        assert_eq!(naive.timestamp_subsec_millis(), 250);

        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_record_value_accessors() {
        let record = SampleRecord::new(ts("2024-11-02T10:00:00Z"))
            .with_value(Metric::CpuUsage, 12.5)
            .with_value(Metric::MessageSentThroughput, 40.0);

        assert_eq!(record.value(Metric::CpuUsage), Some(12.5));
        assert_eq!(record.value(Metric::MessageSentThroughput), Some(40.0));
        assert_eq!(record.value(Metric::MemoryUsageMb), None);

        match record.require(Metric::MemoryUsageMb, 7) {
            Err(AnalysisError::MissingField { field, index }) => {
                assert_eq!(field, "memory_usage_mb");
                assert_eq!(index, 7);
            }
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_run_rejects_empty() {
        let err = Run::new(config(), Vec::new()).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedInput { .. }));
    }

    #[test]
    fn test_run_rejects_out_of_order_timestamps() {
        let records = vec![
            SampleRecord::new(ts("2024-11-02T10:00:05Z")),
            SampleRecord::new(ts("2024-11-02T10:00:01Z")),
        ];
        let err = Run::new(config(), records).unwrap_err();
        assert!(err.to_string().contains("record 1"));
    }

    #[test]
    fn test_run_accepts_equal_timestamps() {
        let records = vec![
            SampleRecord::new(ts("2024-11-02T10:00:05Z")),
            SampleRecord::new(ts("2024-11-02T10:00:05Z")),
        ];
        let run = Run::new(config(), records).unwrap();
        assert_eq!(run.len(), 2);
        assert_eq!(run.start(), ts("2024-11-02T10:00:05Z"));
    }

    #[test]
    fn test_run_rejects_negative_values() {
        let records =
            vec![SampleRecord::new(ts("2024-11-02T10:00:05Z")).with_value(Metric::CpuUsage, -1.0)];
        let err = Run::new(config(), records).unwrap_err();
        assert!(err.to_string().contains("cpu_usage"));
    }
}
