//! # Resource Bench Report - Main Entry Point
//!
//! Renders comparison charts from resource-monitor sample files.
//!
//! ## Operation
//!
//! 1. **Parse arguments**: clap-derived [`Args`]
//! 2. **Initialize logging**: tracing with the colorized formatter
//! 3. **Build configuration**: validated [`ReportConfig`]
//! 4. **Run report**: load, compute, render, optionally export and open
//!
//! ## Error Handling
//!
//! Any loader, normalizer or aggregator failure aborts the invocation before
//! a chart is produced. The error is logged once and the process exits
//! with status 1.

use anyhow::Result;
use clap::Parser;
use resource_bench_report::{
    cli::{Args, ReportConfig},
    error::AnalysisError,
    logging,
    runner::ReportRunner,
};
use tracing::{debug, error, info};

fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG overrides the --verbose default
    logging::init(args.verbose);

    info!("Starting Resource Bench Report v{}", resource_bench_report::VERSION);
    debug!("Configuration: {:?}", args);

    let config = ReportConfig::try_from(&args)?;
    let runner = ReportRunner::new(config);

    match runner.run() {
        Ok(outcome) => {
            info!("Report completed: {} chart(s) written", outcome.charts.len());
            Ok(())
        }
        Err(e) => {
            match e.downcast_ref::<AnalysisError>() {
                Some(AnalysisError::MissingRun { run_size, system }) => error!(
                    "No samples for {} with {} kernels; collect that run or drop it from --run-sizes",
                    system, run_size
                ),
                Some(cause) => error!("Invalid benchmark data: {}", cause),
                None => error!("Report failed: {:#}", e),
            }
            std::process::exit(1);
        }
    }
}
