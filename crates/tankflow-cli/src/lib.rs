//! Command-line front end for Tankflow.
//!
//! Loads a scenario file, runs the simulation to completion, and renders the
//! two overflow times either as the classic `"<last> <all>"` line or as JSON.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use tankflow_core::error::SimError;
use tankflow_core::report::RunReport;
use tankflow_data::{DataLoadError, Format, load_scenario};

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "tankflow")]
#[command(about = "Simulate tanks filling from a shared, redistributing flow", long_about = None)]
pub struct Args {
    /// Scenario file to simulate
    pub path: PathBuf,

    /// Input format; detected from the file extension when omitted
    #[arg(short, long, value_parser = parse_format)]
    pub format: Option<Format>,

    /// How to print the result
    #[arg(short, long, value_enum, default_value_t = OutputMode::Text)]
    pub output: OutputMode,

    /// Log every simulation step to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_format(s: &str) -> Result<Format, String> {
    s.parse()
}

/// Result rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// `"<last> <all>"` on one line
    Text,
    /// A JSON object with rounded and raw times
    Json,
}

/// Errors surfaced to the user.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Load(#[from] DataLoadError),
    #[error("simulation failed: {0}")]
    Simulation(#[from] SimError),
    #[error("cannot encode output: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct JsonOutput {
    last_overflow_time: u64,
    all_overflow_time: u64,
    raw: RawTimes,
    steps: u64,
}

#[derive(Debug, Serialize)]
struct RawTimes {
    last_overflow_time: f64,
    all_overflow_time: f64,
}

/// Default log filter when `RUST_LOG` is unset.
pub fn default_log_filter(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

/// Load, simulate, and render according to `args`.
pub fn run(args: &Args) -> Result<String, CliError> {
    let scenario = load_scenario(&args.path, args.format)?;
    let mut engine = scenario.engine()?;
    let report = engine.run()?;
    render(&report, args.output)
}

/// Render a finished run.
pub fn render(report: &RunReport, mode: OutputMode) -> Result<String, CliError> {
    let times = report.overflow_times();
    match mode {
        OutputMode::Text => Ok(times.to_string()),
        OutputMode::Json => {
            let output = JsonOutput {
                last_overflow_time: times.last,
                all_overflow_time: times.all,
                raw: RawTimes {
                    last_overflow_time: report.last_overflow_time,
                    all_overflow_time: report.all_overflow_time,
                },
                steps: report.steps,
            };
            Ok(serde_json::to_string(&output)?)
        }
    }
}
