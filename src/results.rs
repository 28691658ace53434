use crate::aggregate::Summary;
use crate::cli::ReportMode;
use crate::metrics::{mean_max, Metric};
use crate::normalize::NormalizedSeries;
use crate::utils::{
    format_elapsed_secs, format_megabytes, format_percent, format_table_row,
    format_table_separator,
};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Normalized series of one system for one run size
#[derive(Debug, Clone, Serialize)]
pub struct SystemSeries {
    pub system: String,
    pub run_size: u32,
    pub series: NormalizedSeries,
}

/// Computed data backing the rendered charts
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportData {
    Detail { runs: Vec<SystemSeries> },
    Summary { summaries: Vec<Summary> },
}

/// Report metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub version: String,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub mode: ReportMode,
    pub delay: String,
    pub systems: Vec<String>,
}

/// Exported document: metadata plus the computed series
#[derive(Debug, Clone, Serialize)]
pub struct ReportDocument {
    pub metadata: ReportMetadata,
    pub data: ReportData,
}

impl ReportDocument {
    pub fn new(mode: ReportMode, delay: &str, systems: &[String], data: ReportData) -> Self {
        Self {
            metadata: ReportMetadata {
                version: crate::VERSION.to_string(),
                generated_at: chrono::Utc::now(),
                mode,
                delay: delay.to_string(),
                systems: systems.to_vec(),
            },
            data,
        }
    }
}

/// Writes report documents as pretty-printed JSON
pub struct ResultsWriter {
    output_file: PathBuf,
}

impl ResultsWriter {
    pub fn new(output_file: &Path) -> Self {
        Self {
            output_file: output_file.to_path_buf(),
        }
    }

    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    pub fn write(&self, document: &ReportDocument) -> Result<()> {
        if let Some(parent) = self.output_file.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {:?}", parent))?;
            }
        }

        let json = serde_json::to_string_pretty(document)?;
        std::fs::write(&self.output_file, json)
            .with_context(|| format!("Failed to write {:?}", self.output_file))?;

        info!("Series written to: {:?}", self.output_file);
        Ok(())
    }
}

const SUMMARY_WIDTHS: [usize; 6] = [10, 8, 10, 10, 11, 11];

/// Console table of mean/max CPU and memory per system and run size
pub fn summary_table(summaries: &[Summary]) -> Vec<String> {
    let separator = format_table_separator(&SUMMARY_WIDTHS);
    let mut lines = vec![
        separator.clone(),
        format_table_row(
            &["System", "Kernels", "Avg CPU", "Max CPU", "Avg Memory", "Max Memory"],
            &SUMMARY_WIDTHS,
        ),
        separator.clone(),
    ];

    for summary in summaries {
        let (Some(cpu), Some(mem)) = (
            summary.get(Metric::CpuUsage),
            summary.get(Metric::MemoryUsageMb),
        ) else {
            continue;
        };

        for (c, m) in cpu.points.iter().zip(&mem.points) {
            let cells = [
                summary.system.clone(),
                c.run_size.to_string(),
                format_percent(c.mean),
                format_percent(c.max),
                format_megabytes(m.mean),
                format_megabytes(m.max),
            ];
            let cells: Vec<&str> = cells.iter().map(String::as_str).collect();
            lines.push(format_table_row(&cells, &SUMMARY_WIDTHS));
        }
    }

    lines.push(separator);
    lines
}

const DETAIL_WIDTHS: [usize; 6] = [10, 8, 10, 10, 10, 11];

/// Console table of duration and mean/max CPU and memory per system
pub fn detail_table(runs: &[SystemSeries]) -> Vec<String> {
    let separator = format_table_separator(&DETAIL_WIDTHS);
    let mut lines = vec![
        separator.clone(),
        format_table_row(
            &["System", "Samples", "Duration", "Avg CPU", "Max CPU", "Max Memory"],
            &DETAIL_WIDTHS,
        ),
        separator.clone(),
    ];

    for run in runs {
        let cpu = run.series.get(Metric::CpuUsage).and_then(mean_max);
        let mem = run.series.get(Metric::MemoryUsageMb).and_then(mean_max);
        let cells = [
            run.system.clone(),
            run.series.len().to_string(),
            format_elapsed_secs(run.series.duration_secs()),
            cpu.map(|s| format_percent(s.mean)).unwrap_or_default(),
            cpu.map(|s| format_percent(s.max)).unwrap_or_default(),
            mem.map(|s| format_megabytes(s.max)).unwrap_or_default(),
        ];
        let cells: Vec<&str> = cells.iter().map(String::as_str).collect();
        lines.push(format_table_row(&cells, &DETAIL_WIDTHS));
    }

    lines.push(separator);
    lines
}

pub fn log_table(lines: &[String]) {
    for line in lines {
        info!("{}", line);
    }
}
