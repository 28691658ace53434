//! Per-run detail charts: metrics over elapsed time, one line per system.

use super::{display_name, versus, Figure, Panel, PlotLine};
use crate::metrics::Metric;
use crate::normalize::NormalizedSeries;

const ELAPSED_LABEL: &str = "Time (seconds since start)";

fn time_panel(metric: Metric, runs: &[(&str, &NormalizedSeries)]) -> Panel {
    let names: Vec<&str> = runs.iter().map(|(system, _)| *system).collect();
    let title = format!("{} Comparison: {}", metric.label(), versus(&names));

    runs.iter().enumerate().fold(
        Panel::new(title, ELAPSED_LABEL, metric.axis_label()),
        |panel, (index, (system, series))| {
            let label = format!("{} {} ({})", display_name(system), metric.label(), metric.unit());
            panel.with_line(PlotLine::new(label, series.points(metric), index))
        },
    )
}

fn stacked(title: String, panels: Vec<Panel>) -> Figure {
    Figure {
        title: Some(title),
        footer: None,
        rows: panels.len(),
        cols: 1,
        size: (1000, 500 * panels.len() as u32),
        panels,
    }
}

/// CPU and memory over time, stacked vertically
pub fn resources_figure(run_size: u32, runs: &[(&str, &NormalizedSeries)]) -> Figure {
    let panels = Metric::RESOURCES
        .iter()
        .map(|&metric| time_panel(metric, runs))
        .collect();
    stacked(format!("Resource usage with {} kernels", run_size), panels)
}

/// Sent and received message throughput over time, stacked vertically
pub fn throughput_figure(run_size: u32, runs: &[(&str, &NormalizedSeries)]) -> Figure {
    let panels = Metric::THROUGHPUT
        .iter()
        .map(|&metric| time_panel(metric, runs))
        .collect();
    stacked(format!("Message throughput with {} kernels", run_size), panels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn series(elapsed: &[f64], cpu: &[f64], mem: &[f64]) -> NormalizedSeries {
        let mut map = BTreeMap::new();
        map.insert(Metric::CpuUsage, cpu.to_vec());
        map.insert(Metric::MemoryUsageMb, mem.to_vec());
        NormalizedSeries {
            elapsed_seconds: elapsed.to_vec(),
            series: map,
        }
    }

    #[test]
    fn test_resources_figure_layout() {
        let zasper = series(&[0.0, 5.0], &[10.0, 12.0], &[40.0, 41.0]);
        let jupyter = series(&[0.0, 5.0, 10.0], &[30.0, 35.0, 33.0], &[300.0, 320.0, 310.0]);

        let figure = resources_figure(8, &[("zasper", &zasper), ("jupyter", &jupyter)]);

        assert_eq!(figure.rows, 2);
        assert_eq!(figure.cols, 1);
        assert_eq!(figure.panels.len(), 2);

        let cpu = &figure.panels[0];
        assert_eq!(cpu.title, "CPU Usage Comparison: Zasper vs Jupyter");
        assert_eq!(cpu.y_label, "CPU Usage (%)");
        assert_eq!(cpu.lines[0].label, "Zasper CPU Usage (%)");
        assert_eq!(cpu.lines[0].points, vec![(0.0, 10.0), (5.0, 12.0)]);
        assert_eq!(cpu.lines[1].points.len(), 3);

        let mem = &figure.panels[1];
        assert_eq!(mem.title, "Memory Usage Comparison: Zasper vs Jupyter");
        assert_eq!(mem.lines[1].label, "Jupyter Memory Usage (MB)");
    }

    #[test]
    fn test_throughput_figure_uses_message_rates() {
        let mut run = series(&[0.0, 2.0], &[1.0, 1.0], &[1.0, 1.0]);
        run.series.insert(Metric::MessageSentThroughput, vec![0.0, 8.0]);
        run.series.insert(Metric::MessageReceivedThroughput, vec![0.0, 7.5]);

        let figure = throughput_figure(2, &[("zasper", &run)]);
        assert_eq!(figure.panels[0].lines[0].points, vec![(0.0, 0.0), (2.0, 8.0)]);
        assert_eq!(figure.panels[1].lines[0].points, vec![(0.0, 0.0), (2.0, 7.5)]);
        assert_eq!(figure.panels[1].y_label, "Received Throughput (msg/s)");
    }
}
