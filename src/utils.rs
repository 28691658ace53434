//! # Utility Functions and Helper Module
//!
//! Helpers shared by the report pipeline: input validation for the
//! invocation surface, human-readable formatting of the computed values,
//! console table layout and opening rendered charts in the platform viewer.
//!
//! ## Key Functionality Categories
//!
//! - **Validation**: Run sizes, sweeps, system names and delay labels
//! - **Formatting**: Elapsed seconds, percentages and megabytes
//! - **Display Helpers**: Fixed-width table rows for summary output
//! - **Viewer**: Hand a rendered file to `xdg-open` / `open` / `start`
//!
//! ## Usage Examples
//!
//! ```rust
//! use resource_bench_report::utils::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! assert_eq!(format_percent(12.5), "12.50%");
//! assert_eq!(format_megabytes(2048.0), "2.00 GB");
//!
//! validate_sweep(&[2, 4, 8])?; // OK
//! # Ok(())
//! # }
//! ```

use anyhow::{bail, Result};
use std::collections::HashSet;
use std::path::Path;
use std::process::Command;

/// Largest run size accepted on the command line
pub const MAX_RUN_SIZE: u32 = 100_000;

/// Validate a single run size (number of kernels)
///
/// ## Validation Rules
///
/// - **Minimum**: 1 kernel; a run of zero kernels was never collected
/// - **Maximum**: [`MAX_RUN_SIZE`], well above any sweep the collector runs
pub fn validate_run_size(run_size: u32) -> Result<()> {
    if run_size == 0 {
        bail!("Run size cannot be zero");
    }
    if run_size > MAX_RUN_SIZE {
        bail!(
            "Run size {} is too large (maximum {})",
            run_size,
            MAX_RUN_SIZE
        );
    }
    Ok(())
}

/// Validate the run-size sweep used by the summary report
///
/// The sweep becomes the x-axis of every summary chart, so it must be
/// non-empty, every entry must be a valid run size, and no size may appear
/// twice (a duplicate would plot two points at the same x).
///
/// ## Returns
/// - `Ok(())`: Sweep is valid
/// - `Err(anyhow::Error)`: First offending entry with a descriptive message
pub fn validate_sweep(sweep: &[u32]) -> Result<()> {
    if sweep.is_empty() {
        bail!("Run-size sweep cannot be empty");
    }

    let mut seen = HashSet::new();
    for &run_size in sweep {
        validate_run_size(run_size)?;
        if !seen.insert(run_size) {
            bail!("Run size {} appears more than once in the sweep", run_size);
        }
    }
    Ok(())
}

/// Validate the names of the compared systems
///
/// Names end up in file names, so they must be non-empty and free of path
/// separators. Duplicates are rejected because each system gets its own
/// legend entry and color.
pub fn validate_systems(systems: &[String]) -> Result<()> {
    if systems.is_empty() {
        bail!("At least one system is required");
    }

    let mut seen = HashSet::new();
    for system in systems {
        validate_path_component("System name", system)?;
        if !seen.insert(system.as_str()) {
            bail!("System `{}` is listed more than once", system);
        }
    }
    Ok(())
}

/// Validate a delay label (the `<delay>` in `data/<delay>ms/`)
pub fn validate_delay_label(delay: &str) -> Result<()> {
    validate_path_component("Delay", delay)
}

fn validate_path_component(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        bail!("{} cannot be empty", what);
    }
    if value.contains('/') || value.contains('\\') || value == "." || value == ".." {
        bail!("{} `{}` must not contain path separators", what, value);
    }
    Ok(())
}

/// Format elapsed seconds for display
///
/// Sub-minute values keep two decimals, longer spans switch to `XmYs`.
///
/// ```rust
/// # use resource_bench_report::utils::format_elapsed_secs;
/// assert_eq!(format_elapsed_secs(3.5), "3.50s");
/// assert_eq!(format_elapsed_secs(125.0), "2m5s");
/// ```
pub fn format_elapsed_secs(secs: f64) -> String {
    if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        let whole = secs.round() as u64;
        format!("{}m{}s", whole / 60, whole % 60)
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Format a megabyte quantity, switching to GB from 1024 MB
pub fn format_megabytes(mb: f64) -> String {
    if mb < 1024.0 {
        format!("{:.2} MB", mb)
    } else {
        format!("{:.2} GB", mb / 1024.0)
    }
}

/// Render one fixed-width table row
///
/// ## Formatting
///
/// - **Alignment**: Left-aligned within each column
/// - **Separators**: Columns are delimited with `|`
/// - **Missing widths**: Columns without a width fall back to 10
///
/// ```rust
/// # use resource_bench_report::utils::format_table_row;
/// assert_eq!(format_table_row(&["zasper", "2"], &[8, 3]), "| zasper   | 2   |");
/// ```
pub fn format_table_row(columns: &[&str], widths: &[usize]) -> String {
    let mut row = String::from("|");
    for (i, column) in columns.iter().enumerate() {
        let width = widths.get(i).copied().unwrap_or(10);
        row.push_str(&format!(" {:width$} |", column, width = width));
    }
    row
}

/// Render a table separator matching [`format_table_row`]
///
/// ```text
/// +----------+-----+
/// | zasper   | 2   |
/// +----------+-----+
/// ```
pub fn format_table_separator(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for &width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line
}

/// Open a rendered chart with the platform's default viewer
///
/// This replaces an interactive display window: the chart is written to
/// disk first and then handed to the desktop environment. The viewer is
/// spawned and not waited on.
pub fn open_in_viewer(path: &Path) -> std::io::Result<()> {
    #[cfg(target_os = "linux")]
    {
        Command::new("xdg-open").arg(path).spawn().map(|_| ())
    }

    #[cfg(target_os = "macos")]
    {
        Command::new("open").arg(path).spawn().map(|_| ())
    }

    #[cfg(target_os = "windows")]
    {
        Command::new("cmd")
            .arg("/C")
            .arg("start")
            .arg(path)
            .spawn()
            .map(|_| ())
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        let _ = path;
        Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "no known viewer on this platform",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_run_size() {
        assert!(validate_run_size(1).is_ok());
        assert!(validate_run_size(100).is_ok());
        assert!(validate_run_size(0).is_err());
        assert!(validate_run_size(MAX_RUN_SIZE + 1).is_err());
    }

    #[test]
    fn test_validate_sweep() {
        assert!(validate_sweep(&crate::defaults::RUN_SIZES).is_ok());
        assert!(validate_sweep(&[]).is_err());
        assert!(validate_sweep(&[2, 0]).is_err());
        assert!(validate_sweep(&[2, 4, 2]).is_err());
    }

    #[test]
    fn test_validate_systems() {
        let systems = vec!["zasper".to_string(), "jupyter".to_string()];
        assert!(validate_systems(&systems).is_ok());
        assert!(validate_systems(&[]).is_err());
        assert!(validate_systems(&["a/b".to_string()]).is_err());
        assert!(validate_systems(&["".to_string()]).is_err());
        assert!(validate_systems(&["x".to_string(), "x".to_string()]).is_err());
    }

    #[test]
    fn test_validate_delay_label() {
        assert!(validate_delay_label("100").is_ok());
        assert!(validate_delay_label("..").is_err());
        assert!(validate_delay_label("1/2").is_err());
        assert!(validate_delay_label(" ").is_err());
    }

    #[test]
    fn test_format_elapsed_secs() {
        assert_eq!(format_elapsed_secs(0.0), "0.00s");
        assert_eq!(format_elapsed_secs(59.994), "59.99s");
        assert_eq!(format_elapsed_secs(60.0), "1m0s");
        assert_eq!(format_elapsed_secs(3600.0), "60m0s");
    }

    #[test]
    fn test_format_percent_and_megabytes() {
        assert_eq!(format_percent(0.0), "0.00%");
        assert_eq!(format_percent(150.5), "150.50%");
        assert_eq!(format_megabytes(512.25), "512.25 MB");
        assert_eq!(format_megabytes(1536.0), "1.50 GB");
    }

    #[test]
    fn test_table_formatting() {
        let widths = [6, 4];
        assert_eq!(format_table_separator(&widths), "+--------+------+");
        assert_eq!(format_table_row(&["System", "Size"], &widths), "| System | Size |");
        assert_eq!(format_table_row(&["a"], &[]), "| a          |");
    }
}
