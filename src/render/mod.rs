//! Chart rendering
//!
//! Charts are described as a [`Figure`]: a grid of [`Panel`]s, each holding
//! one [`PlotLine`] per compared system. The detail and summary builders
//! only arrange already-computed series into figures; [`render`] turns a
//! figure into a PNG or SVG file with plotters.

pub mod detail;
pub mod summary;

use crate::cli::ImageFormat;
use anyhow::{anyhow, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::ops::Range;
use std::path::Path;

pub use detail::{resources_figure, throughput_figure};
pub use summary::summary_figure;

const FONT: &str = "sans-serif";
const FOOTER_HEIGHT: u32 = 48;

/// Line colors, assigned to systems in the order they were given
pub const PALETTE: [RGBColor; 6] = [
    RGBColor(0x58, 0x3B, 0xD8),
    RGBColor(0xE4, 0x6E, 0x2E),
    RGBColor(0x11, 0x77, 0x33),
    RGBColor(0x88, 0x22, 0x55),
    RGBColor(0x44, 0xAA, 0x99),
    RGBColor(0x88, 0x88, 0x88),
];

pub fn system_color(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
}

impl Marker {
    pub fn for_system(index: usize) -> Self {
        if index % 2 == 0 {
            Marker::Circle
        } else {
            Marker::Square
        }
    }
}

/// One system's line within a panel
#[derive(Debug, Clone, PartialEq)]
pub struct PlotLine {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub color: RGBColor,
    pub marker: Marker,
}

impl PlotLine {
    pub fn new(label: impl Into<String>, points: Vec<(f64, f64)>, system_index: usize) -> Self {
        Self {
            label: label.into(),
            points,
            color: system_color(system_index),
            marker: Marker::for_system(system_index),
        }
    }
}

/// A single set of axes
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub lines: Vec<PlotLine>,
    pub note: Option<String>,
}

impl Panel {
    pub fn new(
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            lines: Vec::new(),
            note: None,
        }
    }

    pub fn with_line(mut self, line: PlotLine) -> Self {
        self.lines.push(line);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn x_range(&self) -> Range<f64> {
        span_range(self.lines.iter().flat_map(|l| l.points.iter().map(|p| p.0)))
    }

    pub fn y_range(&self) -> Range<f64> {
        value_range(self.lines.iter().flat_map(|l| l.points.iter().map(|p| p.1)))
    }
}

/// A complete chart image
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: Option<String>,
    pub footer: Option<String>,
    pub rows: usize,
    pub cols: usize,
    pub size: (u32, u32),
    pub panels: Vec<Panel>,
}

/// Capitalized system name for titles and legends ("zasper" -> "Zasper")
pub fn display_name(system: &str) -> String {
    let mut chars = system.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "Zasper vs Jupyter" for the systems in legend order
pub fn versus(systems: &[&str]) -> String {
    systems
        .iter()
        .map(|s| display_name(s))
        .collect::<Vec<_>>()
        .join(" vs ")
}

/// Range covering all `values` exactly, widened when degenerate
pub fn span_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = min_max(values).unwrap_or((0.0, 1.0));
    if hi > lo {
        lo..hi
    } else {
        (lo - 0.5)..(hi + 0.5)
    }
}

/// Range from zero (or the minimum, if negative) to the maximum plus 5%
/// headroom
pub fn value_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = min_max(values).unwrap_or((0.0, 1.0));
    let lo = lo.min(0.0);
    let hi = if hi > lo { hi } else { lo + 1.0 };
    lo..(hi + (hi - lo) * 0.05)
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Render `figure` to `path` in the given format
pub fn render(figure: &Figure, path: &Path, format: ImageFormat) -> Result<()> {
    let result = match format {
        ImageFormat::Png => {
            let root = BitMapBackend::new(path, figure.size).into_drawing_area();
            draw_figure(&root, figure).map_err(|e| e.to_string())
        }
        ImageFormat::Svg => {
            let root = SVGBackend::new(path, figure.size).into_drawing_area();
            draw_figure(&root, figure).map_err(|e| e.to_string())
        }
    };

    result.map_err(|e| anyhow!("Failed to render chart {}: {}", path.display(), e))
}

fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let mut area = match &figure.title {
        Some(title) => root.titled(title, (FONT, 28))?,
        None => root.clone(),
    };

    if let Some(footer) = &figure.footer {
        let (_, height) = area.dim_in_pixel();
        let (upper, lower) = area.split_vertically(height.saturating_sub(FOOTER_HEIGHT) as i32);
        let (width, footer_height) = lower.dim_in_pixel();
        let style = TextStyle::from((FONT, 16).into_font())
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));
        lower.draw_text(
            footer,
            &style,
            ((width / 2) as i32, (footer_height / 2) as i32),
        )?;
        area = upper;
    }

    let cells = area.split_evenly((figure.rows, figure.cols));
    for (cell, panel) in cells.iter().zip(&figure.panels) {
        draw_panel(cell, panel)?;
    }

    root.present()?;
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let x_range = panel.x_range();
    let y_range = panel.y_range();

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, (FONT, 20))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(64)
        .build_cartesian_2d(x_range.clone(), y_range.clone())?;

    chart
        .configure_mesh()
        .x_desc(panel.x_label.as_str())
        .y_desc(panel.y_label.as_str())
        .draw()?;

    for line in &panel.lines {
        let color = line.color;
        chart
            .draw_series(LineSeries::new(
                line.points.iter().copied(),
                color.stroke_width(2),
            ))?
            .label(line.label.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });

        match line.marker {
            Marker::Circle => chart.draw_series(
                line.points
                    .iter()
                    .map(|&p| Circle::new(p, 4, color.filled())),
            )?,
            Marker::Square => chart.draw_series(line.points.iter().map(|&p| {
                EmptyElement::at(p) + Rectangle::new([(-4, -4), (4, 4)], color.filled())
            }))?,
        };
    }

    if !panel.lines.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    if let Some(note) = &panel.note {
        let x = x_range.end - (x_range.end - x_range.start) * 0.02;
        let y = (y_range.start + y_range.end) / 2.0;
        let style = TextStyle::from((FONT, 14).into_font())
            .color(&BLACK)
            .pos(Pos::new(HPos::Right, VPos::Center));
        chart
            .plotting_area()
            .draw(&Text::new(note.clone(), (x, y), style))?;
    }

    Ok(())
}
