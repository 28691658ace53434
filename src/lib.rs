//! # Resource Bench Report Library
//!
//! Turns resource-monitor samples of two (or more) compared systems into
//! comparison charts. Each sample file holds timestamped CPU, memory and
//! message-throughput readings for one system under one configuration.
//!
//! ## Pipeline
//!
//! - **Per-run detail**: `loader` → `normalize` → `render`. Runs are put on a
//!   shared zero-based time axis so systems sampled at different wall-clock
//!   times can be overlaid.
//! - **Cross-run summary**: `loader` → `aggregate` → `render`. Every run of a
//!   run-size sweep is reduced to mean and max per metric and plotted against
//!   run size.
//!
//! Every stage is a pure, synchronous transformation of its inputs. Loading
//! and computing finish for all runs before anything is drawn, so a failure
//! never leaves a partially rendered chart behind.
//!
//! ## Usage Example
//!
//! ```rust
//! use resource_bench_report::{aggregate, normalize, parse_run, Metric, RunConfig};
//! use std::collections::BTreeMap;
//!
//! # fn main() -> Result<(), resource_bench_report::AnalysisError> {
//! let content = r#"[
//!     {"timestamp": "2024-11-02T10:00:00Z", "cpu_usage": 10, "memory_usage_mb": 90},
//!     {"timestamp": "2024-11-02T10:00:01Z", "cpu_usage": 20, "memory_usage_mb": 95},
//!     {"timestamp": "2024-11-02T10:00:03Z", "cpu_usage": 30, "memory_usage_mb": 92}
//! ]"#;
//! let run = parse_run(content, "inline", RunConfig::new("zasper", "100", 2), &Metric::RESOURCES)?;
//!
//! let series = normalize(&run, &[Metric::CpuUsage])?;
//! assert_eq!(series.elapsed_seconds, vec![0.0, 1.0, 3.0]);
//! assert_eq!(series.get(Metric::CpuUsage), Some(&[10.0, 20.0, 30.0][..]));
//!
//! let mut runs: BTreeMap<u32, _> = BTreeMap::new();
//! runs.insert(2, run);
//! let summary = aggregate("zasper", &[2], &runs, &[Metric::CpuUsage])?;
//! assert_eq!(summary.get(Metric::CpuUsage).unwrap().means(), vec![20.0]);
//! # Ok(())
//! # }
//! ```

/// Sample-file decoding and validation
///
/// Reads a JSON array of sample records into a [`Run`], enforcing that the
/// run is non-empty, ordered in time, and carries every field the caller
/// needs.
pub mod loader;

/// Relative-time projection of a run into index-aligned series
pub mod normalize;

/// Mean/max reduction of a run-size sweep
pub mod aggregate;

/// Command-line interface and configuration
///
/// Provides argument parsing using clap and converts the parsed arguments
/// into a validated [`ReportConfig`] from which every input and output
/// path is derived.
pub mod cli;

pub mod error;
pub mod logging;
pub mod metrics;

/// Chart construction and rendering with plotters
pub mod render;

/// JSON export of computed series and console summary tables
pub mod results;

/// Invocation driver: load everything, compute everything, then render
pub mod runner;

pub mod samples;
pub mod utils;

pub use aggregate::{aggregate, AggregatePoint, Summary, SummarySeries};
pub use cli::{Args, ImageFormat, ReportConfig, ReportMode};
pub use error::AnalysisError;
pub use loader::{load_run, parse_run};
pub use metrics::Metric;
pub use normalize::{normalize, NormalizedSeries};
pub use runner::{ReportOutcome, ReportRunner};
pub use samples::{Run, RunConfig, SampleRecord};

/// The current version of the report tool
///
/// Recorded in exported JSON so a document can be traced back to the
/// build that produced it.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration values
///
/// These mirror the layout the resource monitor writes: one directory per
/// request delay, one file per system and kernel count.
pub mod defaults {
    /// Kernel counts of the summary sweep
    ///
    /// Roughly doubling steps from 2 up to 100 kernels, which is the set of
    /// runs the monitor collects for each delay.
    pub const RUN_SIZES: [u32; 7] = [2, 4, 8, 16, 32, 64, 100];

    /// Compared systems, in legend order
    pub const SYSTEMS: [&str; 2] = ["zasper", "jupyter"];

    /// Root of the sample files (`<DATA_DIR>/<delay>ms/...`)
    pub const DATA_DIR: &str = "data";

    /// Root of the rendered charts (`<PLOTS_DIR>/<delay>ms/...`)
    pub const PLOTS_DIR: &str = "plots";
}
