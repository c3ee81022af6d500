use std::io::BufReader;

use anyhow::Context;
use itertools::Itertools;
use kbench::aggregate::analyze;
use kbench::catalog::{MethodCatalog, MethodDescriptor};
use kbench::list::read_identifier_list;
use kbench::measurement::CountsMode;
use kbench::reader::read_results;
use kbench::report::AnalysisReport;
use lazy_static::lazy_static;
use log::info;

use crate::csv_report::CsvReportOutput;
use crate::opts::{InputFile, InputStream};

const CSV_HEADER: [&str; 7] = [
    "counts_mode",
    "kmer_size",
    "method",
    "avg_ratio",
    "avg_ratio_vs_source",
    "avg_uncompressed",
    "avg_compressed",
];

lazy_static! {
    static ref DEFAULT_CATALOG: MethodCatalog = default_catalog();
}

/// The benchmarked methods and the output artifacts each one produces. The
/// counts-bearing file type, where present, comes second.
fn default_catalog() -> MethodCatalog {
    let descriptors = [
        ("ust", vec!["fasta", "counts"], true),
        ("bcalm", vec!["fasta"], false),
        ("metagraph", vec!["dbg", "counts"], true),
        ("squeakr", vec!["cqf"], true),
    ]
    .into_iter()
    .map(|(name, file_types, supports_counts)| {
        MethodDescriptor::new(name, file_types, supports_counts)
    })
    .collect::<Result<Vec<_>, _>>()
    .expect("Default method descriptors are valid");

    MethodCatalog::new(descriptors).expect("Default method catalog is valid")
}

pub(crate) fn run(
    results: &InputStream,
    sequences: &InputFile,
    kmer_sizes: &InputFile,
    modes: &[CountsMode],
    csv: bool,
    json: bool,
) -> anyhow::Result<()> {
    let results_reader = results
        .as_reader()
        .context("Failed to open the result table")?;
    match results_reader.file_path() {
        Some(path) => info!("Result table: {}", path.display()),
        None => info!("Result table: standard input"),
    }

    let table =
        read_results(results_reader.into_read()).context("Failed to parse the result table")?;
    info!("Loaded {} measurement rows", table.len());

    let sequence_list = read_identifier_list(BufReader::new(
        sequences
            .as_reader()
            .context("Failed to open the sequence list")?
            .into_read(),
    ))
    .context("Failed to read the sequence list")?;
    let kmer_size_list = read_identifier_list(BufReader::new(
        kmer_sizes
            .as_reader()
            .context("Failed to open the k-mer size list")?
            .into_read(),
    ))
    .context("Failed to read the k-mer size list")?;
    info!(
        "{} sequences, {} k-mer sizes",
        sequence_list.len(),
        kmer_size_list.len()
    );

    let mut csv_output = CsvReportOutput::new(csv);
    csv_output.use_header(&CSV_HEADER)?;

    let mut reports = Vec::new();
    for &mode in modes {
        let report = analyze(
            &table,
            &DEFAULT_CATALOG,
            &sequence_list,
            &kmer_size_list,
            mode,
        )
        .with_context(|| format!("Aggregation failed in {} mode", mode))?;

        for summary in &report.kmer_sizes {
            for (method, averages) in report.methods.iter().zip(&summary.averages) {
                csv_output.add_record([
                    mode.name().to_owned(),
                    summary.kmer_size.str().to_owned(),
                    method.clone(),
                    format!("{:.6}", averages.avg_ratio),
                    format!("{:.6}", averages.avg_ratio_vs_source),
                    format!("{:.1}", averages.avg_uncompressed),
                    format!("{:.1}", averages.avg_compressed),
                ])?;
            }
        }

        if !csv && !json {
            print_report(&report);
        }
        reports.push(report);
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&reports).context("Failed to serialize the report")?
        );
    }
    csv_output.flush()?;

    Ok(())
}

fn print_report(report: &AnalysisReport) {
    println!("=== {} mode ===", report.counts_mode);
    println!("Methods: {}", report.methods.iter().join(", "));

    for summary in &report.kmer_sizes {
        println!();
        println!("k = {}", summary.kmer_size);
        println!(
            "  {:<12} {:>10} {:>14} {:>14} {:>14}",
            "method", "ratio", "ratio vs src", "avg size", "avg compressed"
        );
        for (method, averages) in report.methods.iter().zip(&summary.averages) {
            println!(
                "  {:<12} {:>10.3} {:>14.3} {:>14.1} {:>14.1}",
                method,
                averages.avg_ratio,
                averages.avg_ratio_vs_source,
                averages.avg_uncompressed,
                averages.avg_compressed
            );
        }
    }

    println!();
    println!("Compression tool wins:");
    for (tool, wins) in report.tally.iter() {
        println!("  {}: {}", tool, wins);
    }
    println!();
}
