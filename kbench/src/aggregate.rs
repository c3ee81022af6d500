use std::error::Error;
use std::fmt::{Display, Formatter};

use itertools::Itertools;
use log::debug;

use crate::catalog::{MethodCatalog, MethodDescriptor};
use crate::measurement::{ByteSize, CountsMode, KmerSize};
use crate::report::{AnalysisReport, KmerSummary, MethodAverages, SequenceSizes, ToolTally};
use crate::table::{ResultTable, RowSelection};

/// Error occurring during an aggregation pass.
///
/// All variants are data-shape anomalies and fail fast, naming the offending
/// (sequence, k-mer size, method, file type) tuple. None of them is ever
/// coerced into a silent zero or a NaN: a missing row would corrupt every
/// downstream ratio.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum AggregateError {
    /// No uncompressed (`compression == none`) row exists for the method in
    /// the selected cell.
    MissingUncompressed {
        sequence: String,
        kmer_size: KmerSize,
        method: String,
    },
    /// A per-file-type minimum was taken over zero compressed rows.
    UndefinedMinimum {
        sequence: String,
        kmer_size: KmerSize,
        method: String,
        file_type: String,
    },
    /// The raw source sequence (method `none`) was never measured for this
    /// (sequence, k-mer size) pair.
    MissingSourceSize {
        sequence: String,
        kmer_size: KmerSize,
    },
    /// The best compressed size is zero, so no ratio can be formed.
    ZeroCompressedSize {
        sequence: String,
        kmer_size: KmerSize,
        method: String,
    },
    /// A counts-mode pass was requested for a method without a counts
    /// variant.
    CountsUnsupported { method: String },
}

impl Display for AggregateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregateError::MissingUncompressed {
                sequence,
                kmer_size,
                method,
            } => write!(
                f,
                "No uncompressed row for sequence `{}`, k-mer size {}, method `{}`",
                sequence, kmer_size, method
            ),
            AggregateError::UndefinedMinimum {
                sequence,
                kmer_size,
                method,
                file_type,
            } => write!(
                f,
                "No compressed rows to minimize over for sequence `{}`, k-mer size {}, \
                 method `{}`, file type `{}`",
                sequence, kmer_size, method, file_type
            ),
            AggregateError::MissingSourceSize {
                sequence,
                kmer_size,
            } => write!(
                f,
                "No raw source size for sequence `{}`, k-mer size {}",
                sequence, kmer_size
            ),
            AggregateError::ZeroCompressedSize {
                sequence,
                kmer_size,
                method,
            } => write!(
                f,
                "Zero compressed size for sequence `{}`, k-mer size {}, method `{}`",
                sequence, kmer_size, method
            ),
            AggregateError::CountsUnsupported { method } => {
                write!(f, "Method `{}` has no counts variant", method)
            }
        }
    }
}

impl Error for AggregateError {}

/// The result of an aggregation operation.
pub type AggregateResult<T> = Result<T, AggregateError>;

/// The two reduced sizes of one method in one (sequence, k-mer size) cell.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct MethodSizes {
    uncompressed: ByteSize,
    compressed: ByteSize,
}

impl MethodSizes {
    #[must_use]
    pub fn new(uncompressed: ByteSize, compressed: ByteSize) -> Self {
        Self {
            uncompressed,
            compressed,
        }
    }

    /// Sum of the method's uncompressed output sizes, across all its file
    /// types present in the cell.
    #[inline]
    #[must_use]
    pub fn uncompressed(&self) -> ByteSize {
        self.uncompressed
    }

    /// Sum over the method's charged file types of the best compressed size.
    #[inline]
    #[must_use]
    pub fn compressed(&self) -> ByteSize {
        self.compressed
    }
}

/// Reduces one method over one selected cell.
///
/// `uncompressed` sums the method's `compression == none` rows across all
/// file types; `compressed` sums, per charged file type (see
/// [`MethodDescriptor::file_types_for`]), the minimum compressed size. Each
/// minimization records its winning tool into `tally`; on ties the first row
/// in table order wins.
///
/// # Errors
/// - [`AggregateError::CountsUnsupported`] if the method has no variant for
///   `mode`;
/// - [`AggregateError::MissingUncompressed`] if the cell holds no
///   uncompressed row for the method;
/// - [`AggregateError::UndefinedMinimum`] if a charged file type has no
///   compressed rows to minimize over.
pub fn reduce_method(
    selection: &RowSelection<'_>,
    sequence: &str,
    kmer_size: &KmerSize,
    descriptor: &MethodDescriptor,
    mode: CountsMode,
    tally: &mut ToolTally,
) -> AggregateResult<MethodSizes> {
    let method = descriptor.name();

    if !descriptor.supports(mode) {
        return Err(AggregateError::CountsUnsupported {
            method: method.to_owned(),
        });
    }

    let mut uncompressed = ByteSize::ZERO;
    let mut uncompressed_seen = false;
    for row in selection.uncompressed_rows(method) {
        uncompressed_seen = true;
        uncompressed += row.size();
    }
    if !uncompressed_seen {
        return Err(AggregateError::MissingUncompressed {
            sequence: sequence.to_owned(),
            kmer_size: kmer_size.clone(),
            method: method.to_owned(),
        });
    }

    let mut compressed = ByteSize::ZERO;
    for file_type in descriptor.file_types_for(mode) {
        // the winner's (size, tool) pair is carried through the scan, so the
        // tally never has to find the minimal row again afterwards
        let mut winner: Option<(ByteSize, &str)> = None;
        for (size, tool) in selection.compressed_candidates(method, file_type) {
            match winner {
                Some((best_size, _)) if best_size <= size => {}
                _ => winner = Some((size, tool)),
            }
        }

        let (best_size, best_tool) =
            winner.ok_or_else(|| AggregateError::UndefinedMinimum {
                sequence: sequence.to_owned(),
                kmer_size: kmer_size.clone(),
                method: method.to_owned(),
                file_type: file_type.clone(),
            })?;

        tally.record(best_tool);
        compressed += best_size;
    }

    if compressed > uncompressed {
        // expected invariant violation is a reportable anomaly, not a crash
        debug!(
            "Compressed size {} exceeds uncompressed size {} for sequence `{}`, \
             k-mer size {}, method `{}`",
            compressed, uncompressed, sequence, kmer_size, method
        );
    }

    Ok(MethodSizes::new(uncompressed, compressed))
}

/// Running per-method sums for one k-mer size. Divided by the sequence count
/// only once, after the whole sequence loop has been folded in.
#[derive(Debug, Clone)]
struct KmerAccumulator {
    ratio_sums: Vec<f64>,
    ratio_vs_source_sums: Vec<f64>,
    uncompressed_sums: Vec<f64>,
    compressed_sums: Vec<f64>,
}

impl KmerAccumulator {
    fn new(num_methods: usize) -> Self {
        Self {
            ratio_sums: vec![0.0; num_methods],
            ratio_vs_source_sums: vec![0.0; num_methods],
            uncompressed_sums: vec![0.0; num_methods],
            compressed_sums: vec![0.0; num_methods],
        }
    }

    fn add(&mut self, method_index: usize, sizes: &MethodSizes, source_size: ByteSize) {
        let compressed = sizes.compressed().as_f64();

        self.ratio_sums[method_index] += sizes.uncompressed().as_f64() / compressed;
        self.ratio_vs_source_sums[method_index] += source_size.as_f64() / compressed;
        self.uncompressed_sums[method_index] += sizes.uncompressed().as_f64();
        self.compressed_sums[method_index] += compressed;
    }

    fn finalize(self, num_sequences: usize) -> Vec<MethodAverages> {
        // an empty sequence list folds nothing in; keep the zeros instead of
        // dividing them into NaNs
        let n = if num_sequences == 0 {
            1.0
        } else {
            num_sequences as f64
        };

        (0..self.ratio_sums.len())
            .map(|i| MethodAverages {
                avg_ratio: self.ratio_sums[i] / n,
                avg_ratio_vs_source: self.ratio_vs_source_sums[i] / n,
                avg_uncompressed: self.uncompressed_sums[i] / n,
                avg_compressed: self.compressed_sums[i] / n,
            })
            .collect()
    }
}

/// Runs one full counts-mode aggregation pass.
///
/// Iterates k-mer size → sequence → method → file type, in list/catalog
/// order, reducing every (sequence, k-mer size, method) cell with
/// [`reduce_method`] and folding the results into per-k-mer-size averages
/// and the global tool tally. Methods without a variant for `mode` are not
/// part of the pass; the report's `methods` vector names the ones that are.
///
/// The pass is a pure function of its inputs: re-running it over the same
/// table and lists yields an identical report.
///
/// # Errors
/// Fails fast with the first [`AggregateError`] encountered, in iteration
/// order.
pub fn analyze(
    table: &ResultTable,
    catalog: &MethodCatalog,
    sequences: &[String],
    kmer_sizes: &[String],
    mode: CountsMode,
) -> AggregateResult<AnalysisReport> {
    let methods = catalog.methods_for(mode).collect_vec();
    let method_names = methods
        .iter()
        .map(|descriptor| descriptor.name().to_owned())
        .collect_vec();

    let mut tally = ToolTally::new();
    let mut kmer_summaries = Vec::with_capacity(kmer_sizes.len());

    for kmer_token in kmer_sizes {
        let kmer_size = KmerSize::new(kmer_token);
        let mut accumulator = KmerAccumulator::new(methods.len());
        let mut sequence_sizes = Vec::with_capacity(sequences.len());

        for sequence in sequences {
            let selection = table.select(sequence, mode, &kmer_size);
            let source_size = table.source_size(sequence, &kmer_size).ok_or_else(|| {
                AggregateError::MissingSourceSize {
                    sequence: sequence.clone(),
                    kmer_size: kmer_size.clone(),
                }
            })?;

            let mut uncompressed = Vec::with_capacity(methods.len());
            let mut compressed = Vec::with_capacity(methods.len());

            for (method_index, descriptor) in methods.iter().enumerate() {
                let sizes = reduce_method(
                    &selection,
                    sequence,
                    &kmer_size,
                    descriptor,
                    mode,
                    &mut tally,
                )?;

                if sizes.compressed() == ByteSize::ZERO {
                    return Err(AggregateError::ZeroCompressedSize {
                        sequence: sequence.clone(),
                        kmer_size: kmer_size.clone(),
                        method: descriptor.name().to_owned(),
                    });
                }

                accumulator.add(method_index, &sizes, source_size);
                uncompressed.push(sizes.uncompressed());
                compressed.push(sizes.compressed());
            }

            sequence_sizes.push(SequenceSizes {
                sequence: sequence.clone(),
                uncompressed,
                compressed,
            });
        }

        debug!(
            "Finalized k-mer size {} over {} sequences and {} methods ({} mode)",
            kmer_size,
            sequences.len(),
            methods.len(),
            mode
        );

        kmer_summaries.push(KmerSummary {
            kmer_size,
            sequences: sequence_sizes,
            averages: accumulator.finalize(sequences.len()),
        });
    }

    Ok(AnalysisReport {
        counts_mode: mode,
        methods: method_names,
        kmer_sizes: kmer_summaries,
        tally,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::_internal_test_data::{simple_catalog, simple_table};
    use crate::aggregate::{analyze, reduce_method, AggregateError};
    use crate::catalog::{MethodCatalog, MethodDescriptor};
    use crate::measurement::{
        ByteSize, Compression, CountsMode, KmerSize, Measurement,
    };
    use crate::report::ToolTally;
    use crate::table::ResultTable;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|&v| v.to_owned()).collect()
    }

    #[test]
    fn test_reduce_single_file_type_is_plain_minimum() {
        let table = simple_table();
        let catalog = simple_catalog();
        let selection = table.select("seqA", CountsMode::NoCounts, &KmerSize::from(21_u64));
        let mut tally = ToolTally::new();

        let sizes = reduce_method(
            &selection,
            "seqA",
            &KmerSize::from(21_u64),
            catalog.get("bcalm").unwrap(),
            CountsMode::NoCounts,
            &mut tally,
        )
        .unwrap();

        assert_eq!(sizes.uncompressed(), ByteSize::new(900));
        assert_eq!(sizes.compressed(), ByteSize::new(450));
        assert_eq!(tally.wins("gzip"), 1);
        assert_eq!(tally.wins("zstd"), 0);
    }

    #[test]
    fn test_reduce_example_from_contract() {
        // sizes {none: 1000, gzip: 300, zstd: 250} -> 1000 / 250, zstd wins
        let table = simple_table();
        let catalog = simple_catalog();
        let selection = table.select("seqA", CountsMode::NoCounts, &KmerSize::from(21_u64));
        let mut tally = ToolTally::new();

        let sizes = reduce_method(
            &selection,
            "seqA",
            &KmerSize::from(21_u64),
            catalog.get("ust").unwrap(),
            CountsMode::NoCounts,
            &mut tally,
        )
        .unwrap();

        assert_eq!(sizes.uncompressed(), ByteSize::new(1000));
        assert_eq!(sizes.compressed(), ByteSize::new(250));
        assert_eq!(tally.wins("zstd"), 1);
        assert_eq!(tally.total_wins(), 1);
    }

    #[test]
    fn test_reduce_multi_file_type_sums_minimums() {
        let table = simple_table();
        let catalog = simple_catalog();
        let selection = table.select("seqA", CountsMode::Counts, &KmerSize::from(21_u64));
        let mut tally = ToolTally::new();

        let sizes = reduce_method(
            &selection,
            "seqA",
            &KmerSize::from(21_u64),
            catalog.get("ust").unwrap(),
            CountsMode::Counts,
            &mut tally,
        )
        .unwrap();

        // fasta: none 1000 + counts: none 500
        assert_eq!(sizes.uncompressed(), ByteSize::new(1500));
        // min(300, 250) + min(200, 220)
        assert_eq!(sizes.compressed(), ByteSize::new(450));
        assert_eq!(tally.wins("zstd"), 1);
        assert_eq!(tally.wins("gzip"), 1);
    }

    #[test]
    fn test_no_counts_pass_charges_first_file_type_only() {
        let table = simple_table();
        let catalog = simple_catalog();
        let selection = table.select("seqA", CountsMode::NoCounts, &KmerSize::from(21_u64));
        let mut tally = ToolTally::new();

        let sizes = reduce_method(
            &selection,
            "seqA",
            &KmerSize::from(21_u64),
            catalog.get("ust").unwrap(),
            CountsMode::NoCounts,
            &mut tally,
        )
        .unwrap();

        // ust supports counts, but its counts file must not be charged here
        assert_eq!(sizes.compressed(), ByteSize::new(250));
        assert_eq!(tally.total_wins(), 1);
    }

    #[test]
    fn test_counts_pass_over_counts_incapable_method_fails() {
        let table = simple_table();
        let catalog = simple_catalog();
        let selection = table.select("seqA", CountsMode::Counts, &KmerSize::from(21_u64));
        let mut tally = ToolTally::new();

        let result = reduce_method(
            &selection,
            "seqA",
            &KmerSize::from(21_u64),
            catalog.get("bcalm").unwrap(),
            CountsMode::Counts,
            &mut tally,
        );

        assert_eq!(
            result,
            Err(AggregateError::CountsUnsupported {
                method: "bcalm".to_owned()
            })
        );
    }

    #[test]
    fn test_missing_method_rows_fail_instead_of_zero() {
        let table = simple_table();
        let catalog = MethodCatalog::new([
            MethodDescriptor::new("squeakr", ["cqf"], true).unwrap(),
        ])
        .unwrap();

        let result = analyze(
            &table,
            &catalog,
            &strings(&["seqA"]),
            &strings(&["21"]),
            CountsMode::NoCounts,
        );

        assert_eq!(
            result,
            Err(AggregateError::MissingUncompressed {
                sequence: "seqA".to_owned(),
                kmer_size: KmerSize::from(21_u64),
                method: "squeakr".to_owned(),
            })
        );
    }

    #[test]
    fn test_undefined_minimum_fails_loudly() {
        // an uncompressed row exists, but there is nothing to minimize over
        let table = ResultTable::new([
            Measurement::new(
                "seqA",
                "none",
                CountsMode::NoCounts,
                21_u64,
                "fasta",
                Compression::None,
                ByteSize::new(1200),
            ),
            Measurement::new(
                "seqA",
                "ust",
                CountsMode::NoCounts,
                21_u64,
                "fasta",
                Compression::None,
                ByteSize::new(1000),
            ),
        ]);
        let catalog = simple_catalog();
        let selection = table.select("seqA", CountsMode::NoCounts, &KmerSize::from(21_u64));
        let mut tally = ToolTally::new();

        let result = reduce_method(
            &selection,
            "seqA",
            &KmerSize::from(21_u64),
            catalog.get("ust").unwrap(),
            CountsMode::NoCounts,
            &mut tally,
        );

        assert_eq!(
            result,
            Err(AggregateError::UndefinedMinimum {
                sequence: "seqA".to_owned(),
                kmer_size: KmerSize::from(21_u64),
                method: "ust".to_owned(),
                file_type: "fasta".to_owned(),
            })
        );
        assert_eq!(tally.total_wins(), 0);
    }

    #[test]
    fn test_zero_compressed_size_is_an_error() {
        let table = ResultTable::new([
            Measurement::new(
                "seqA",
                "none",
                CountsMode::NoCounts,
                21_u64,
                "fasta",
                Compression::None,
                ByteSize::new(1200),
            ),
            Measurement::new(
                "seqA",
                "bcalm",
                CountsMode::NoCounts,
                21_u64,
                "fasta",
                Compression::None,
                ByteSize::new(1000),
            ),
            Measurement::new(
                "seqA",
                "bcalm",
                CountsMode::NoCounts,
                21_u64,
                "fasta",
                Compression::Tool("gzip".to_owned()),
                ByteSize::ZERO,
            ),
        ]);
        let catalog = MethodCatalog::new([
            MethodDescriptor::new("bcalm", ["fasta"], false).unwrap(),
        ])
        .unwrap();

        let result = analyze(
            &table,
            &catalog,
            &strings(&["seqA"]),
            &strings(&["21"]),
            CountsMode::NoCounts,
        );

        assert_eq!(
            result,
            Err(AggregateError::ZeroCompressedSize {
                sequence: "seqA".to_owned(),
                kmer_size: KmerSize::from(21_u64),
                method: "bcalm".to_owned(),
            })
        );
    }

    #[test]
    fn test_missing_source_size_is_an_error() {
        let table = ResultTable::new([Measurement::new(
            "seqA",
            "ust",
            CountsMode::NoCounts,
            21_u64,
            "fasta",
            Compression::None,
            ByteSize::new(1000),
        )]);

        let result = analyze(
            &table,
            &simple_catalog(),
            &strings(&["seqA"]),
            &strings(&["21"]),
            CountsMode::NoCounts,
        );

        assert_eq!(
            result,
            Err(AggregateError::MissingSourceSize {
                sequence: "seqA".to_owned(),
                kmer_size: KmerSize::from(21_u64),
            })
        );
    }

    #[test]
    fn test_single_sequence_averages_are_exact_ratios() {
        let table = simple_table();
        let catalog = simple_catalog();

        let report = analyze(
            &table,
            &catalog,
            &strings(&["seqA"]),
            &strings(&["21"]),
            CountsMode::NoCounts,
        )
        .unwrap();

        let averages = &report.kmer_sizes[0].averages;
        assert_relative_eq!(averages[0].avg_ratio, 1000.0 / 250.0);
        assert_relative_eq!(averages[0].avg_ratio_vs_source, 1200.0 / 250.0);
        assert_relative_eq!(averages[1].avg_ratio, 900.0 / 450.0);
        assert_relative_eq!(averages[1].avg_ratio_vs_source, 1200.0 / 450.0);
    }

    #[test]
    fn test_full_pass_averages() {
        let table = simple_table();
        let catalog = simple_catalog();
        let sequences = strings(&["seqA", "seqB"]);
        let kmer_sizes = strings(&["21", "31"]);

        let report = analyze(
            &table,
            &catalog,
            &sequences,
            &kmer_sizes,
            CountsMode::NoCounts,
        )
        .unwrap();

        assert_eq!(report.methods, ["ust", "bcalm"]);
        assert_eq!(report.kmer_sizes.len(), 2);

        let k21 = &report.kmer_sizes[0];
        assert_eq!(k21.kmer_size, KmerSize::from(21_u64));
        // both sequences compress 4:1 with ust and 2:1 with bcalm
        assert_relative_eq!(k21.averages[0].avg_ratio, 4.0);
        assert_relative_eq!(k21.averages[1].avg_ratio, 2.0);
        assert_relative_eq!(k21.averages[0].avg_ratio_vs_source, 4.8);
        assert_relative_eq!(k21.averages[0].avg_uncompressed, 1500.0);
        assert_relative_eq!(k21.averages[0].avg_compressed, 375.0);

        let k21_seq_a = &k21.sequences[0];
        assert_eq!(k21_seq_a.sequence, "seqA");
        assert_eq!(
            k21_seq_a.uncompressed,
            [ByteSize::new(1000), ByteSize::new(900)]
        );
        assert_eq!(
            k21_seq_a.compressed,
            [ByteSize::new(250), ByteSize::new(450)]
        );
    }

    #[test]
    fn test_tally_accounts_for_every_minimization() {
        let table = simple_table();
        let catalog = simple_catalog();
        let sequences = strings(&["seqA", "seqB"]);
        let kmer_sizes = strings(&["21", "31"]);

        let no_counts = analyze(
            &table,
            &catalog,
            &sequences,
            &kmer_sizes,
            CountsMode::NoCounts,
        )
        .unwrap();
        // 2 methods x 1 charged file type x 4 (sequence, k-mer size) pairs
        assert_eq!(no_counts.tally.total_wins(), 8);
        assert_eq!(no_counts.tally.wins("zstd"), 4);
        assert_eq!(no_counts.tally.wins("gzip"), 4);

        let counts = analyze(&table, &catalog, &sequences, &kmer_sizes, CountsMode::Counts)
            .unwrap();
        // 1 counts-capable method x 2 file types x 4 pairs
        assert_eq!(counts.methods, ["ust"]);
        assert_eq!(counts.tally.total_wins(), 8);
    }

    #[test]
    fn test_analyze_is_idempotent() {
        let table = simple_table();
        let catalog = simple_catalog();
        let sequences = strings(&["seqA", "seqB"]);
        let kmer_sizes = strings(&["21", "31"]);

        let first = analyze(
            &table,
            &catalog,
            &sequences,
            &kmer_sizes,
            CountsMode::NoCounts,
        )
        .unwrap();
        let second = analyze(
            &table,
            &catalog,
            &sequences,
            &kmer_sizes,
            CountsMode::NoCounts,
        )
        .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_lists_yield_empty_report() {
        let table = simple_table();
        let catalog = simple_catalog();

        let report = analyze(&table, &catalog, &[], &[], CountsMode::NoCounts).unwrap();

        assert!(report.kmer_sizes.is_empty());
        assert_eq!(report.tally.total_wins(), 0);
    }

    #[test]
    fn test_no_sequences_yield_zero_averages_not_nan() {
        let table = simple_table();
        let catalog = simple_catalog();

        let report = analyze(
            &table,
            &catalog,
            &[],
            &strings(&["21"]),
            CountsMode::NoCounts,
        )
        .unwrap();

        assert_eq!(report.kmer_sizes.len(), 1);
        assert!(report.kmer_sizes[0].sequences.is_empty());
        assert!(report.kmer_sizes[0]
            .averages
            .iter()
            .all(|averages| averages.avg_ratio == 0.0 && averages.avg_compressed == 0.0));
    }
}
