use kbench::_internal_test_data::{simple_catalog, SIMPLE_RESULTS_CSV};
use kbench::aggregate::{analyze, AggregateError};
use kbench::list::read_identifier_list;
use kbench::measurement::{ByteSize, CountsMode, KmerSize};
use kbench::reader::read_results;

const SEQUENCE_LIST: &str = "# test sequences\nseqA\n";
const KMER_SIZE_LIST: &str = "# k-mer sizes\n21\n";

#[test_log::test]
fn test_csv_to_report() {
    let table = read_results(SIMPLE_RESULTS_CSV.as_bytes()).unwrap();
    let sequences = read_identifier_list(SEQUENCE_LIST.as_bytes()).unwrap();
    let kmer_sizes = read_identifier_list(KMER_SIZE_LIST.as_bytes()).unwrap();

    let report = analyze(
        &table,
        &simple_catalog(),
        &sequences,
        &kmer_sizes,
        CountsMode::NoCounts,
    )
    .unwrap();

    assert_eq!(report.counts_mode, CountsMode::NoCounts);
    assert_eq!(report.methods, ["ust", "bcalm"]);
    assert_eq!(report.kmer_sizes.len(), 1);

    let k21 = &report.kmer_sizes[0];
    assert_eq!(k21.kmer_size, KmerSize::from(21_u64));
    assert_eq!(k21.sequences.len(), 1);
    assert_eq!(
        k21.sequences[0].uncompressed,
        [ByteSize::new(1000), ByteSize::new(900)]
    );
    assert_eq!(
        k21.sequences[0].compressed,
        [ByteSize::new(250), ByteSize::new(450)]
    );

    assert_eq!(k21.averages[0].avg_ratio, 4.0);
    assert_eq!(k21.averages[0].avg_ratio_vs_source, 4.8);
    assert_eq!(k21.averages[1].avg_ratio, 2.0);

    assert_eq!(report.tally.wins("zstd"), 1);
    assert_eq!(report.tally.wins("gzip"), 1);
    assert_eq!(report.tally.total_wins(), 2);
}

#[test_log::test]
fn test_counts_pass_over_no_counts_data_fails_fast() {
    // SIMPLE_RESULTS_CSV only holds no-counts measurements; a counts pass
    // must abort on the first missing cell rather than report zeros
    let table = read_results(SIMPLE_RESULTS_CSV.as_bytes()).unwrap();
    let sequences = read_identifier_list(SEQUENCE_LIST.as_bytes()).unwrap();
    let kmer_sizes = read_identifier_list(KMER_SIZE_LIST.as_bytes()).unwrap();

    let result = analyze(
        &table,
        &simple_catalog(),
        &sequences,
        &kmer_sizes,
        CountsMode::Counts,
    );

    assert_eq!(
        result,
        Err(AggregateError::MissingUncompressed {
            sequence: "seqA".to_owned(),
            kmer_size: KmerSize::from(21_u64),
            method: "ust".to_owned(),
        })
    );
}

#[test]
fn test_report_round_trips_through_json() {
    let table = read_results(SIMPLE_RESULTS_CSV.as_bytes()).unwrap();
    let sequences = read_identifier_list(SEQUENCE_LIST.as_bytes()).unwrap();
    let kmer_sizes = read_identifier_list(KMER_SIZE_LIST.as_bytes()).unwrap();

    let report = analyze(
        &table,
        &simple_catalog(),
        &sequences,
        &kmer_sizes,
        CountsMode::NoCounts,
    )
    .unwrap();

    let json = serde_json::to_string(&report).unwrap();
    let parsed: kbench::report::AnalysisReport = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed, report);
}
