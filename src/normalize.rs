//! # Metric Normalizer
//!
//! Projects a [`Run`] onto a relative time axis. `elapsed_seconds[i]` is the
//! distance of record `i` from the first record, so runs collected at
//! different wall-clock times can be overlaid on one chart.
//!
//! Values are copied as-is, in record order. Nothing is resampled,
//! interpolated or filled in.

use crate::error::AnalysisError;
use crate::metrics::Metric;
use crate::samples::Run;
use chrono::TimeDelta;
use serde::Serialize;
use std::collections::BTreeMap;

/// Index-aligned series derived from one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSeries {
    pub elapsed_seconds: Vec<f64>,
    pub series: BTreeMap<Metric, Vec<f64>>,
}

impl NormalizedSeries {
    pub fn get(&self, metric: Metric) -> Option<&[f64]> {
        self.series.get(&metric).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.elapsed_seconds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elapsed_seconds.is_empty()
    }

    /// Seconds between the first and last sample
    pub fn duration_secs(&self) -> f64 {
        self.elapsed_seconds.last().copied().unwrap_or(0.0)
    }

    /// `(elapsed, value)` pairs for one metric, ready for plotting
    pub fn points(&self, metric: Metric) -> Vec<(f64, f64)> {
        self.get(metric)
            .map(|values| {
                self.elapsed_seconds
                    .iter()
                    .copied()
                    .zip(values.iter().copied())
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn delta_secs(delta: TimeDelta) -> f64 {
    match delta.num_nanoseconds() {
        Some(ns) => ns as f64 / 1_000_000_000.0,
        None => delta.num_milliseconds() as f64 / 1_000.0,
    }
}

/// Normalize `run` for the requested metrics
///
/// Fails with `MissingField` on the first record lacking any requested
/// metric; no partial series is returned.
pub fn normalize(run: &Run, metrics: &[Metric]) -> Result<NormalizedSeries, AnalysisError> {
    let start = run.start();
    let elapsed_seconds = run
        .records()
        .iter()
        .map(|record| delta_secs(record.timestamp - start))
        .collect();

    let mut series = BTreeMap::new();
    for &metric in metrics {
        let values = run
            .records()
            .iter()
            .enumerate()
            .map(|(index, record)| record.require(metric, index))
            .collect::<Result<Vec<_>, _>>()?;
        series.insert(metric, values);
    }

    Ok(NormalizedSeries {
        elapsed_seconds,
        series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::{parse_timestamp, RunConfig, SampleRecord};

    fn run_of(samples: &[(&str, f64, Option<f64>)]) -> Run {
        let records = samples
            .iter()
            .map(|&(ts, cpu, mem)| {
                let record = SampleRecord::new(parse_timestamp(ts).unwrap())
                    .with_value(Metric::CpuUsage, cpu);
                match mem {
                    Some(mem) => record.with_value(Metric::MemoryUsageMb, mem),
                    None => record,
                }
            })
            .collect();
        Run::new(RunConfig::new("jupyter", "100", 4), records).unwrap()
    }

    #[test]
    fn test_normalize_relative_time_and_projection() {
        let run = run_of(&[
            ("2024-11-02T10:00:00Z", 10.0, Some(100.0)),
            ("2024-11-02T10:00:01Z", 20.0, Some(110.0)),
            ("2024-11-02T10:00:03Z", 30.0, Some(120.0)),
        ]);

        let normalized = normalize(&run, &[Metric::CpuUsage]).unwrap();
        assert_eq!(normalized.elapsed_seconds, vec![0.0, 1.0, 3.0]);
        assert_eq!(normalized.get(Metric::CpuUsage).unwrap(), &[10.0, 20.0, 30.0]);
        assert!(normalized.get(Metric::MemoryUsageMb).is_none());
        assert_eq!(normalized.duration_secs(), 3.0);
    }

    #[test]
    fn test_normalize_preserves_values_exactly() {
        let run = run_of(&[
            ("2024-11-02T10:00:00Z", 0.1, Some(512.25)),
            ("2024-11-02T10:00:05Z", 99.9, Some(0.0)),
        ]);
        let normalized = normalize(&run, &Metric::RESOURCES).unwrap();

        for (i, record) in run.records().iter().enumerate() {
            for metric in Metric::RESOURCES {
                assert_eq!(normalized.get(metric).unwrap()[i], record.value(metric).unwrap());
            }
        }
        assert_eq!(normalized.len(), run.len());
    }

    #[test]
    fn test_normalize_sub_second_and_offsets() {
        // Same instant expressed in two offsets, then half a second later
        let run = run_of(&[
            ("2024-11-02T10:00:00+00:00", 1.0, None),
            ("2024-11-02T12:00:00.5+02:00", 2.0, None),
        ]);
        let normalized = normalize(&run, &[Metric::CpuUsage]).unwrap();
        assert_eq!(normalized.elapsed_seconds, vec![0.0, 0.5]);
    }

    #[test]
    fn test_normalize_missing_field_is_an_error() {
        let run = run_of(&[
            ("2024-11-02T10:00:00Z", 10.0, Some(100.0)),
            ("2024-11-02T10:00:01Z", 20.0, None),
        ]);

        match normalize(&run, &Metric::RESOURCES) {
            Err(AnalysisError::MissingField { field, index }) => {
                assert_eq!(field, "memory_usage_mb");
                assert_eq!(index, 1);
            }
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let run = run_of(&[
            ("2024-11-02T10:00:00Z", 3.0, Some(1.0)),
            ("2024-11-02T10:00:02Z", 4.0, Some(2.0)),
        ]);
        let first = normalize(&run, &Metric::RESOURCES).unwrap();
        let second = normalize(&run, &Metric::RESOURCES).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_points_pairs_time_and_value() {
        let run = run_of(&[
            ("2024-11-02T10:00:00Z", 3.0, None),
            ("2024-11-02T10:00:02Z", 4.0, None),
        ]);
        let normalized = normalize(&run, &[Metric::CpuUsage]).unwrap();
        assert_eq!(normalized.points(Metric::CpuUsage), vec![(0.0, 3.0), (2.0, 4.0)]);
        assert!(normalized.points(Metric::MemoryUsageMb).is_empty());
    }
}
