//! # tabscope command-line entry point
//!
//! ```bash
//! tabscope profile data.csv --target price -o report.json
//! tabscope quality data.csv
//! tabscope correlations data.csv --compact
//! ```
//!
//! Reports go to stdout (or `--output`); logs go to stderr and to rotating
//! files under `--log-dir` (default: the platform data directory). `RUST_LOG`
//! controls verbosity.

#![warn(clippy::all, rust_2018_idioms)]

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    tabscope::logging::init(cli.resolved_log_dir().as_deref())?;
    cli::run_command(cli)
}
