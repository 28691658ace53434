//! # Report Runner
//!
//! Drives one invocation end to end:
//!
//! 1. **Load** every run the report needs, for every system
//! 2. **Compute** normalized or aggregated series for all of them
//! 3. **Render** the charts, only once every previous step succeeded
//!
//! Any load or compute failure aborts before the output directory is even
//! created, so a chart is never drawn from partial data. Errors keep their
//! [`AnalysisError`](crate::error::AnalysisError) type underneath the added
//! context and can be recovered with `downcast_ref`.

use crate::aggregate::{aggregate, Summary};
use crate::cli::{ReportConfig, ReportMode};
use crate::loader::load_run;
use crate::metrics::Metric;
use crate::normalize::normalize;
use crate::render::{self, Figure};
use crate::results::{self, ReportData, ReportDocument, ResultsWriter, SystemSeries};
use crate::samples::{Run, RunConfig};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// What an invocation produced
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub data: ReportData,
    pub charts: Vec<PathBuf>,
}

/// Executes a report described by a [`ReportConfig`]
pub struct ReportRunner {
    config: ReportConfig,
}

impl ReportRunner {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Load and compute everything, without touching the output directory
    pub fn compute(&self) -> Result<ReportData> {
        match self.config.mode {
            ReportMode::Detail => self.compute_detail(),
            ReportMode::Summary => self.compute_summary(),
        }
    }

    /// Compute, render and optionally export and open
    pub fn run(&self) -> Result<ReportOutcome> {
        info!(
            "{} report for delay {}ms, systems: {}",
            self.config.mode,
            self.config.delay,
            self.config.systems.join(", ")
        );

        let data = self.compute()?;
        let figures = self.figures(&data);

        match &data {
            ReportData::Detail { runs } => results::log_table(&results::detail_table(runs)),
            ReportData::Summary { summaries } => {
                results::log_table(&results::summary_table(summaries))
            }
        }

        let output_dir = self.config.output_dir();
        std::fs::create_dir_all(&output_dir)
            .with_context(|| format!("Failed to create output directory {:?}", output_dir))?;

        let mut charts = Vec::with_capacity(figures.len());
        for (stem, figure) in &figures {
            let path = self.config.chart_path(stem);
            render::render(figure, &path, self.config.format)?;
            info!("Chart written to: {:?}", path);
            charts.push(path);
        }

        if let Some(export_path) = &self.config.export_json {
            let document = ReportDocument::new(
                self.config.mode,
                &self.config.delay,
                &self.config.systems,
                data.clone(),
            );
            ResultsWriter::new(export_path).write(&document)?;
        }

        if self.config.open {
            for chart in &charts {
                if let Err(e) = crate::utils::open_in_viewer(chart) {
                    warn!("Could not open {:?}: {}", chart, e);
                }
            }
        }

        Ok(ReportOutcome { data, charts })
    }

    fn load(&self, system: &str, run_size: u32, required: &[Metric]) -> Result<Run> {
        let path = self.config.run_path(system, run_size);
        debug!("Loading {:?}", path);
        let config = RunConfig::new(system, self.config.delay.clone(), run_size);
        let run = load_run(&path, config, required)
            .with_context(|| format!("Failed to load {:?}", path))?;
        Ok(run)
    }

    fn compute_detail(&self) -> Result<ReportData> {
        let run_size = self
            .config
            .run_size
            .context("--run-size is required in detail mode")?;
        let required = self.config.required_metrics();

        let runs = self
            .config
            .systems
            .iter()
            .map(|system| self.load(system, run_size, &required))
            .collect::<Result<Vec<_>>>()?;

        let runs = runs
            .iter()
            .map(|run| {
                let series = normalize(run, &required)
                    .with_context(|| format!("Failed to normalize {}", run.config()))?;
                Ok(SystemSeries {
                    system: run.config().system.clone(),
                    run_size,
                    series,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ReportData::Detail { runs })
    }

    fn compute_summary(&self) -> Result<ReportData> {
        let required = self.config.required_metrics();
        let sweep = &self.config.run_sizes;

        let mut loaded: BTreeMap<&str, BTreeMap<u32, Run>> = BTreeMap::new();
        for system in &self.config.systems {
            let runs = loaded.entry(system.as_str()).or_default();
            for &run_size in sweep {
                runs.insert(run_size, self.load(system, run_size, &required)?);
            }
        }

        let none = BTreeMap::new();
        let summaries = self
            .config
            .systems
            .iter()
            .map(|system| {
                let runs = loaded.get(system.as_str()).unwrap_or(&none);
                aggregate(system, sweep, runs, &required)
                    .with_context(|| format!("Failed to aggregate runs of {}", system))
            })
            .collect::<Result<Vec<Summary>>>()?;

        Ok(ReportData::Summary { summaries })
    }

    /// Figures to render for `data`, keyed by file stem
    pub fn figures(&self, data: &ReportData) -> Vec<(String, Figure)> {
        match data {
            ReportData::Detail { runs } => {
                let run_size = runs.first().map(|r| r.run_size).unwrap_or_default();
                let pairs: Vec<_> = runs.iter().map(|r| (r.system.as_str(), &r.series)).collect();

                let mut figures = vec![(
                    format!("resources_{}kernels", run_size),
                    render::resources_figure(run_size, &pairs),
                )];
                if self.config.throughput {
                    figures.push((
                        format!("throughput_{}kernels", run_size),
                        render::throughput_figure(run_size, &pairs),
                    ));
                }
                figures
            }
            ReportData::Summary { summaries } => vec![(
                "summary_resources".to_string(),
                render::summary_figure(summaries),
            )],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use crate::loader::parse_run;

    fn runner(mode: ReportMode, throughput: bool) -> ReportRunner {
        let args = Args {
            mode,
            delay: "100".to_string(),
            run_size: Some(8),
            run_sizes: vec![2, 8],
            systems: vec!["zasper".to_string(), "jupyter".to_string()],
            throughput,
            ..Default::default()
        };
        ReportRunner::new(ReportConfig::try_from(&args).unwrap())
    }

    fn detail_data(required: &[Metric]) -> ReportData {
        let content = r#"[
            {"timestamp": "2024-11-02T10:00:00Z", "cpu_usage": 10, "memory_usage_mb": 90,
             "message_sent_throughput": 4, "message_received_throughput": 3},
            {"timestamp": "2024-11-02T10:00:02Z", "cpu_usage": 12, "memory_usage_mb": 91,
             "message_sent_throughput": 5, "message_received_throughput": 5}
        ]"#;
        let runs = ["zasper", "jupyter"]
            .iter()
            .map(|system| {
                let run = parse_run(content, "inline", RunConfig::new(*system, "100", 8), required)
                    .unwrap();
                SystemSeries {
                    system: system.to_string(),
                    run_size: 8,
                    series: normalize(&run, required).unwrap(),
                }
            })
            .collect();
        ReportData::Detail { runs }
    }

    fn stems(figures: &[(String, Figure)]) -> Vec<&str> {
        figures.iter().map(|(stem, _)| stem.as_str()).collect()
    }

    #[test]
    fn test_detail_figures_without_throughput() {
        let runner = runner(ReportMode::Detail, false);
        let data = detail_data(&runner.config().required_metrics());
        let figures = runner.figures(&data);
        assert_eq!(stems(&figures), vec!["resources_8kernels"]);
    }

    #[test]
    fn test_detail_figures_with_throughput() {
        let runner = runner(ReportMode::Detail, true);
        let data = detail_data(&runner.config().required_metrics());
        let figures = runner.figures(&data);
        assert_eq!(
            stems(&figures),
            vec!["resources_8kernels", "throughput_8kernels"]
        );
    }

    #[test]
    fn test_summary_figure_stem() {
        let runner = runner(ReportMode::Summary, false);
        let figures = runner.figures(&ReportData::Summary {
            summaries: Vec::new(),
        });
        assert_eq!(stems(&figures), vec!["summary_resources"]);
    }

    #[test]
    fn test_compute_reports_missing_data_dir_as_missing_run() {
        let mut runner = runner(ReportMode::Detail, false);
        runner.config.data_dir = PathBuf::from("/nonexistent/resource-bench-report");
        let err = runner.compute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<crate::error::AnalysisError>(),
            Some(crate::error::AnalysisError::MissingRun { run_size: 8, .. })
        ));
    }
}
