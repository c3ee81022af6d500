use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use human_panic::setup_panic;

use crate::logging::init_logging;

mod cli;
mod cmd;
mod csv_report;
mod logging;
mod opts;

fn main() -> anyhow::Result<()> {
    setup_panic!();

    let cli: Cli = Cli::parse();

    init_logging(cli.verbose.log_level_filter()).expect("Could not initialize logging");

    match &cli.command {
        Commands::Analyze {
            results,
            sequences,
            kmer_sizes,
            mode,
            csv,
            json,
        } => {
            cmd::analyze::run(results, sequences, kmer_sizes, mode.counts_modes(), *csv, *json)
                .context("Failed to analyze the result table")?;
        }
    }

    Ok(())
}
