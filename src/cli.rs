use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::metrics::Metric;

/// Resource Bench Report - Charts CPU, memory and message throughput of compared systems
#[derive(Parser, Debug, Clone, Default)]
#[clap(version, about, long_about = None)]
pub struct Args {
    /// Report to produce: per-run detail charts or the cross-run summary
    #[clap(long, value_enum, default_value_t = ReportMode::Detail, help_heading = "Core Options")]
    pub mode: ReportMode,

    /// Delay between requests used for the runs (e.g. 100 or 100ms)
    #[clap(short = 'd', long, value_parser = parse_delay_label, help_heading = "Core Options")]
    pub delay: String,

    /// Number of kernels of the run to chart (detail mode)
    #[clap(short = 'k', long, help_heading = "Core Options")]
    pub run_size: Option<u32>,

    /// Run sizes making up the summary sweep (summary mode)
    #[clap(long, num_args = 1.., default_values_t = crate::defaults::RUN_SIZES.to_vec())]
    pub run_sizes: Vec<u32>,

    /// Systems to compare, in legend order
    #[clap(short = 's', long, num_args = 1.., default_values_t = crate::defaults::SYSTEMS.iter().map(|s| s.to_string()).collect::<Vec<_>>())]
    pub systems: Vec<String>,

    /// Directory holding `<delay>ms/benchmark_results_<system>_<n>kernels.json`
    #[clap(long, default_value = crate::defaults::DATA_DIR)]
    pub data_dir: PathBuf,

    /// Directory receiving `<delay>ms/<chart>.<format>`
    #[clap(long, default_value = crate::defaults::PLOTS_DIR)]
    pub plots_dir: PathBuf,

    /// Also chart message throughput (detail mode)
    #[clap(long, default_value_t = false)]
    pub throughput: bool,

    /// Image format of rendered charts
    #[clap(long, value_enum, default_value_t = ImageFormat::Png)]
    pub format: ImageFormat,

    /// Write the computed series to this JSON file
    #[clap(long)]
    pub export_json: Option<PathBuf>,

    /// Open rendered charts in the system viewer
    #[clap(long, default_value_t = false)]
    pub open: bool,

    /// Verbose output
    #[clap(short = 'v', long, default_value_t = false)]
    pub verbose: bool,
}

/// Available report modes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    /// CPU and memory over time for one run size
    #[default]
    #[clap(name = "detail")]
    Detail,

    /// Mean and max CPU and memory across the run-size sweep
    #[clap(name = "summary")]
    Summary,
}

impl std::fmt::Display for ReportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportMode::Detail => write!(f, "Detail"),
            ReportMode::Summary => write!(f, "Summary"),
        }
    }
}

/// Output image formats
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    #[default]
    #[clap(name = "png")]
    Png,

    #[clap(name = "svg")]
    Svg,
}

impl ImageFormat {
    pub const fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

/// Validated configuration for one invocation
///
/// Every input and output location is derived from here; nothing is read
/// from process-wide state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportConfig {
    pub mode: ReportMode,
    pub delay: String,
    pub run_size: Option<u32>,
    pub run_sizes: Vec<u32>,
    pub systems: Vec<String>,
    pub data_dir: PathBuf,
    pub plots_dir: PathBuf,
    pub throughput: bool,
    pub format: ImageFormat,
    pub export_json: Option<PathBuf>,
    pub open: bool,
}

impl TryFrom<&Args> for ReportConfig {
    type Error = anyhow::Error;

    fn try_from(args: &Args) -> Result<Self> {
        let config = Self {
            mode: args.mode,
            delay: args.delay.clone(),
            run_size: args.run_size,
            run_sizes: args.run_sizes.clone(),
            systems: args.systems.clone(),
            data_dir: args.data_dir.clone(),
            plots_dir: args.plots_dir.clone(),
            throughput: args.throughput,
            format: args.format,
            export_json: args.export_json.clone(),
            open: args.open,
        };
        config.validate()?;
        Ok(config)
    }
}

impl ReportConfig {
    pub fn validate(&self) -> Result<()> {
        crate::utils::validate_delay_label(&self.delay)?;
        crate::utils::validate_systems(&self.systems)?;

        match self.mode {
            ReportMode::Detail => match self.run_size {
                Some(run_size) => crate::utils::validate_run_size(run_size)?,
                None => bail!("--run-size is required in detail mode"),
            },
            ReportMode::Summary => crate::utils::validate_sweep(&self.run_sizes)?,
        }

        Ok(())
    }

    /// Metrics a run must carry for this report
    pub fn required_metrics(&self) -> Vec<Metric> {
        let mut metrics = Metric::RESOURCES.to_vec();
        if self.throughput && self.mode == ReportMode::Detail {
            metrics.extend(Metric::THROUGHPUT);
        }
        metrics
    }

    /// Directory holding the sample files for this delay
    pub fn input_dir(&self) -> PathBuf {
        self.data_dir.join(format!("{}ms", self.delay))
    }

    /// Directory receiving the charts for this delay
    pub fn output_dir(&self) -> PathBuf {
        self.plots_dir.join(format!("{}ms", self.delay))
    }

    pub fn run_path(&self, system: &str, run_size: u32) -> PathBuf {
        self.input_dir()
            .join(format!("benchmark_results_{}_{}kernels.json", system, run_size))
    }

    pub fn chart_path(&self, stem: &str) -> PathBuf {
        self.output_dir()
            .join(format!("{}.{}", stem, self.format.extension()))
    }
}

/// Parse a delay label, accepting an optional `ms` suffix ("100", "100ms")
fn parse_delay_label(s: &str) -> Result<String, String> {
    let s = s.trim();
    let label = s.strip_suffix("ms").unwrap_or(s).trim();

    if label.is_empty() {
        return Err("Delay cannot be empty".to_string());
    }

    Ok(label.to_string())
}
