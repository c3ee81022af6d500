use std::fmt::{Display, Formatter};

use clap::{ArgEnum, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use kbench::measurement::CountsMode;

use crate::opts::{input_file, input_stream, InputFile, InputStream};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
pub struct Cli {
    #[clap(flatten)]
    pub verbose: Verbosity<InfoLevel>,

    #[clap(subcommand)]
    pub command: Commands,
}

/// Which counts-mode passes to run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ArgEnum)]
pub enum AnalyzeMode {
    Counts,
    NoCounts,
    Both,
}

impl AnalyzeMode {
    /// Returns the counts modes this choice expands to, in pass order.
    #[must_use]
    pub fn counts_modes(&self) -> &'static [CountsMode] {
        match self {
            AnalyzeMode::Counts => &[CountsMode::Counts],
            AnalyzeMode::NoCounts => &[CountsMode::NoCounts],
            AnalyzeMode::Both => &[CountsMode::NoCounts, CountsMode::Counts],
        }
    }
}

impl Display for AnalyzeMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalyzeMode::Counts => write!(f, "counts"),
            AnalyzeMode::NoCounts => write!(f, "no-counts"),
            AnalyzeMode::Both => write!(f, "both"),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize a benchmark result table: best compressed sizes, ratios and
    /// compression-tool wins per method
    Analyze {
        /// Result table CSV path; `-` is the standard input
        #[clap(default_value_t, value_parser = input_stream)]
        results: InputStream,

        /// Test sequence list file (one identifier per line)
        #[clap(long, default_value = "sequences-test.txt", value_parser = input_file)]
        sequences: InputFile,

        /// K-mer size list file (one size per line)
        #[clap(long, default_value = "kmer-sizes.txt", value_parser = input_file)]
        kmer_sizes: InputFile,

        /// Counts mode(s) to aggregate
        #[clap(arg_enum, long, default_value_t = AnalyzeMode::Both)]
        mode: AnalyzeMode,

        /// Output the per-k-mer-size averages as a CSV file to the standard
        /// output
        #[clap(long, value_parser, conflicts_with = "json")]
        csv: bool,

        /// Output the full report as JSON to the standard output
        #[clap(long, value_parser)]
        json: bool,
    },
}
