//! # Run Aggregator
//!
//! Reduces a sweep of runs (one per configured run size) to mean and max per
//! metric, producing one [`SummarySeries`] per metric whose points follow
//! the sweep order. Charts plot these against run size, so the sweep and
//! every series must stay index-aligned.
//!
//! Aggregation is all-or-nothing: a run size without a run aborts the call
//! with `MissingRun` instead of returning a shorter series. Systems are
//! aggregated independently and only zipped together at render time.

use crate::error::AnalysisError;
use crate::metrics::{mean_max, Metric};
use crate::samples::Run;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Lookup of loaded runs by run size
pub trait RunLookup {
    fn run_for(&self, run_size: u32) -> Option<&Run>;
}

impl RunLookup for BTreeMap<u32, Run> {
    fn run_for(&self, run_size: u32) -> Option<&Run> {
        self.get(&run_size)
    }
}

impl<S: BuildHasher> RunLookup for HashMap<u32, Run, S> {
    fn run_for(&self, run_size: u32) -> Option<&Run> {
        self.get(&run_size)
    }
}

/// Mean and max of one metric for one run size
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregatePoint {
    pub run_size: u32,
    pub mean: f64,
    pub max: f64,
}

/// Aggregate points of one metric, in sweep order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummarySeries {
    pub metric: Metric,
    pub points: Vec<AggregatePoint>,
}

impl SummarySeries {
    pub fn means(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.mean).collect()
    }

    pub fn maxes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.max).collect()
    }

    pub fn run_sizes(&self) -> Vec<u32> {
        self.points.iter().map(|p| p.run_size).collect()
    }
}

/// All summary series for one system
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub system: String,
    pub run_sizes: Vec<u32>,
    pub series: BTreeMap<Metric, SummarySeries>,
}

impl Summary {
    pub fn get(&self, metric: Metric) -> Option<&SummarySeries> {
        self.series.get(&metric)
    }
}

/// Aggregate `runs` of `system` over the configured `sweep`
///
/// Runs present in `runs` but absent from `sweep` are ignored.
pub fn aggregate<R: RunLookup + ?Sized>(
    system: &str,
    sweep: &[u32],
    runs: &R,
    metrics: &[Metric],
) -> Result<Summary, AnalysisError> {
    // Resolve the whole sweep first so a gap fails before any work is done
    let ordered = sweep
        .iter()
        .map(|&run_size| {
            runs.run_for(run_size)
                .map(|run| (run_size, run))
                .ok_or_else(|| AnalysisError::missing_run(run_size, system))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut series = BTreeMap::new();
    for &metric in metrics {
        let mut points = Vec::with_capacity(ordered.len());

        for &(run_size, run) in &ordered {
            let values = run
                .records()
                .iter()
                .enumerate()
                .map(|(index, record)| record.require(metric, index))
                .collect::<Result<Vec<_>, _>>()?;

            let stats = mean_max(&values).ok_or_else(|| {
                AnalysisError::malformed(run.config().to_string(), "run contains no records")
            })?;

            points.push(AggregatePoint {
                run_size,
                mean: stats.mean,
                max: stats.max,
            });
        }

        series.insert(metric, SummarySeries { metric, points });
    }

    Ok(Summary {
        system: system.to_string(),
        run_sizes: sweep.to_vec(),
        series,
    })
}
