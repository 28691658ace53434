//! Cross-run summary chart: average and max of CPU and memory against the
//! run-size sweep, one line per system.

use super::{display_name, versus, Figure, Panel, PlotLine};
use crate::aggregate::Summary;
use crate::metrics::Metric;

const RUN_SIZE_LABEL: &str = "Number of Kernels";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Mean,
    Max,
}

impl Statistic {
    const fn title(&self) -> &'static str {
        match self {
            Statistic::Mean => "Average",
            Statistic::Max => "Max",
        }
    }
}

fn note_for(metric: Metric) -> String {
    match metric {
        Metric::CpuUsage => "Lower CPU usage is better".to_string(),
        Metric::MemoryUsageMb => "Lower RAM usage is better".to_string(),
        other => format!("Lower {} is better", other.label().to_lowercase()),
    }
}

fn summary_panel(metric: Metric, statistic: Statistic, summaries: &[Summary]) -> Panel {
    let names: Vec<&str> = summaries.iter().map(|s| s.system.as_str()).collect();
    let title = format!(
        "{}: {} {} ({})",
        versus(&names),
        statistic.title(),
        metric.label(),
        metric.unit()
    );

    summaries
        .iter()
        .enumerate()
        .fold(
            Panel::new(title, RUN_SIZE_LABEL, metric.axis_label()),
            |panel, (index, summary)| {
                let points: Vec<(f64, f64)> = summary
                    .get(metric)
                    .map(|series| {
                        series
                            .points
                            .iter()
                            .map(|p| {
                                let y = match statistic {
                                    Statistic::Mean => p.mean,
                                    Statistic::Max => p.max,
                                };
                                (f64::from(p.run_size), y)
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                let label = format!("{} {}", display_name(&summary.system), metric.label());
                panel.with_line(PlotLine::new(label, points, index))
            },
        )
        .with_note(note_for(metric))
}

/// 2x2 grid: average CPU, max CPU, average memory, max memory
pub fn summary_figure(summaries: &[Summary]) -> Figure {
    let panels = Metric::RESOURCES
        .iter()
        .flat_map(|&metric| {
            [Statistic::Mean, Statistic::Max]
                .into_iter()
                .map(move |statistic| summary_panel(metric, statistic, summaries))
        })
        .collect();

    Figure {
        title: None,
        footer: Some("* Lower CPU and RAM usage indicates better performance.".to_string()),
        rows: 2,
        cols: 2,
        size: (1200, 1200),
        panels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{AggregatePoint, SummarySeries};
    use std::collections::BTreeMap;

    fn summary(system: &str, cpu: &[(u32, f64, f64)]) -> Summary {
        let points: Vec<AggregatePoint> = cpu
            .iter()
            .map(|&(run_size, mean, max)| AggregatePoint { run_size, mean, max })
            .collect();
        let mut series = BTreeMap::new();
        series.insert(
            Metric::CpuUsage,
            SummarySeries {
                metric: Metric::CpuUsage,
                points: points.clone(),
            },
        );
        series.insert(
            Metric::MemoryUsageMb,
            SummarySeries {
                metric: Metric::MemoryUsageMb,
                points,
            },
        );
        Summary {
            system: system.to_string(),
            run_sizes: cpu.iter().map(|p| p.0).collect(),
            series,
        }
    }

    #[test]
    fn test_summary_figure_panels() {
        let zasper = summary("zasper", &[(2, 15.0, 20.0), (4, 25.0, 40.0)]);
        let jupyter = summary("jupyter", &[(2, 30.0, 50.0), (4, 45.0, 90.0)]);

        let figure = summary_figure(&[zasper, jupyter]);
        assert_eq!((figure.rows, figure.cols), (2, 2));
        assert_eq!(figure.panels.len(), 4);

        let avg_cpu = &figure.panels[0];
        assert_eq!(avg_cpu.title, "Zasper vs Jupyter: Average CPU Usage (%)");
        assert_eq!(avg_cpu.x_label, "Number of Kernels");
        assert_eq!(avg_cpu.lines[0].points, vec![(2.0, 15.0), (4.0, 25.0)]);
        assert_eq!(avg_cpu.lines[1].points, vec![(2.0, 30.0), (4.0, 45.0)]);
        assert_eq!(avg_cpu.note.as_deref(), Some("Lower CPU usage is better"));

        let max_cpu = &figure.panels[1];
        assert_eq!(max_cpu.title, "Zasper vs Jupyter: Max CPU Usage (%)");
        assert_eq!(max_cpu.lines[1].points, vec![(2.0, 50.0), (4.0, 90.0)]);

        let max_mem = &figure.panels[3];
        assert_eq!(max_mem.title, "Zasper vs Jupyter: Max Memory Usage (MB)");
        assert_eq!(max_mem.note.as_deref(), Some("Lower RAM usage is better"));
        assert!(figure.footer.is_some());
    }
}
