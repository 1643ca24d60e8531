//! `tankflow` binary.
//!
//! Prints `"<last> <all>"` for the scenario file given as the only
//! positional argument. Logs go to stderr and are filtered by `RUST_LOG`.

use std::process::ExitCode;

use clap::Parser;
use tankflow_cli::{Args, default_log_filter, run};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_log_filter(args.verbose).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match run(&args) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(path = %args.path.display(), "run failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
