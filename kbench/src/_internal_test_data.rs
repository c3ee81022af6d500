use crate::catalog::{MethodCatalog, MethodDescriptor};
use crate::measurement::{ByteSize, Compression, CountsMode, Measurement};
use crate::table::ResultTable;

pub const SIMPLE_RESULTS_CSV: &str = "\
sequence,method,counts,kmer_size,file_type,compression,size
seqA,none,no-counts,21,fasta,none,1200
seqA,ust,no-counts,21,fasta,none,1000
seqA,ust,no-counts,021,fasta,gzip,300
seqA,ust,no-counts,21,fasta,zstd,250
seqA,bcalm,no-counts,21,fasta,none,900
seqA,bcalm,no-counts,21,fasta,gzip,450
seqA,bcalm,no-counts,21,fasta,zstd,500
";

/// A two-method catalog: `ust` emits a sequence file plus a counts file,
/// `bcalm` emits a sequence file only and has no counts variant.
pub fn simple_catalog() -> MethodCatalog {
    MethodCatalog::new([
        MethodDescriptor::new("ust", ["fasta", "counts"], true).unwrap(),
        MethodDescriptor::new("bcalm", ["fasta"], false).unwrap(),
    ])
    .unwrap()
}

fn row(
    sequence: &str,
    method: &str,
    mode: CountsMode,
    kmer_size: u64,
    file_type: &str,
    compression: &str,
    size: u64,
) -> Measurement {
    Measurement::new(
        sequence,
        method,
        mode,
        kmer_size,
        file_type,
        Compression::from_token(compression),
        ByteSize::new(size),
    )
}

/// A fully populated table for two sequences (`seqA`, `seqB`) and two k-mer
/// sizes (21, 31), covering both counts modes for the [`simple_catalog`]
/// methods. All ratios come out to simple fractions:
/// `ust` compresses 4:1 against its own output in no-counts mode, `bcalm`
/// 2:1, and `zstd` always beats `gzip` on `fasta` files while `gzip` wins on
/// `counts` files.
pub fn simple_table() -> ResultTable {
    let mut rows = Vec::new();

    for (sequence, scale) in [("seqA", 1), ("seqB", 2)] {
        for (kmer_size, growth) in [(21, 10), (31, 11)] {
            // raw source sequence, recorded once per (sequence, k-mer size)
            rows.push(row(
                sequence,
                "none",
                CountsMode::NoCounts,
                kmer_size,
                "fasta",
                "none",
                120 * scale * growth,
            ));

            // no-counts pass
            rows.push(row(
                sequence,
                "ust",
                CountsMode::NoCounts,
                kmer_size,
                "fasta",
                "none",
                100 * scale * growth,
            ));
            rows.push(row(
                sequence,
                "ust",
                CountsMode::NoCounts,
                kmer_size,
                "fasta",
                "gzip",
                30 * scale * growth,
            ));
            rows.push(row(
                sequence,
                "ust",
                CountsMode::NoCounts,
                kmer_size,
                "fasta",
                "zstd",
                25 * scale * growth,
            ));
            rows.push(row(
                sequence,
                "bcalm",
                CountsMode::NoCounts,
                kmer_size,
                "fasta",
                "none",
                90 * scale * growth,
            ));
            rows.push(row(
                sequence,
                "bcalm",
                CountsMode::NoCounts,
                kmer_size,
                "fasta",
                "gzip",
                45 * scale * growth,
            ));
            rows.push(row(
                sequence,
                "bcalm",
                CountsMode::NoCounts,
                kmer_size,
                "fasta",
                "zstd",
                50 * scale * growth,
            ));

            // counts pass; bcalm has no counts variant
            rows.push(row(
                sequence,
                "ust",
                CountsMode::Counts,
                kmer_size,
                "fasta",
                "none",
                100 * scale * growth,
            ));
            rows.push(row(
                sequence,
                "ust",
                CountsMode::Counts,
                kmer_size,
                "fasta",
                "gzip",
                30 * scale * growth,
            ));
            rows.push(row(
                sequence,
                "ust",
                CountsMode::Counts,
                kmer_size,
                "fasta",
                "zstd",
                25 * scale * growth,
            ));
            rows.push(row(
                sequence,
                "ust",
                CountsMode::Counts,
                kmer_size,
                "counts",
                "none",
                50 * scale * growth,
            ));
            rows.push(row(
                sequence,
                "ust",
                CountsMode::Counts,
                kmer_size,
                "counts",
                "gzip",
                20 * scale * growth,
            ));
            rows.push(row(
                sequence,
                "ust",
                CountsMode::Counts,
                kmer_size,
                "counts",
                "zstd",
                22 * scale * growth,
            ));
        }
    }

    ResultTable::new(rows)
}

/// A synthetic table with `num_sequences` sequences, for benchmarks.
pub fn synthetic_table(num_sequences: usize) -> ResultTable {
    let mut rows = Vec::new();

    for i in 0..num_sequences {
        let sequence = format!("seq{:04}", i);
        for kmer_size in [21, 31, 41] {
            let base = 1000 + (i as u64 * 37 + kmer_size) % 500;

            rows.push(row(
                &sequence,
                "none",
                CountsMode::NoCounts,
                kmer_size,
                "fasta",
                "none",
                base * 12 / 10,
            ));
            for method in ["ust", "bcalm"] {
                rows.push(row(
                    &sequence,
                    method,
                    CountsMode::NoCounts,
                    kmer_size,
                    "fasta",
                    "none",
                    base,
                ));
                for (tool, divisor) in [("gzip", 3), ("zstd", 4), ("xz", 5)] {
                    rows.push(row(
                        &sequence,
                        method,
                        CountsMode::NoCounts,
                        kmer_size,
                        "fasta",
                        tool,
                        base / divisor,
                    ));
                }
            }
        }
    }

    ResultTable::new(rows)
}
