use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kbench::_internal_test_data::{simple_catalog, synthetic_table};
use kbench::aggregate::analyze;
use kbench::measurement::CountsMode;

fn analyze_500_sequences(c: &mut Criterion) {
    let table = synthetic_table(500);
    let catalog = simple_catalog();
    let sequences: Vec<String> = (0..500).map(|i| format!("seq{:04}", i)).collect();
    let kmer_sizes: Vec<String> = ["21", "31", "41"].iter().map(|&k| k.to_owned()).collect();

    c.bench_function("Aggregate 500 sequences x 3 k-mer sizes", |b| {
        b.iter(|| {
            analyze(
                black_box(&table),
                &catalog,
                &sequences,
                &kmer_sizes,
                CountsMode::NoCounts,
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, analyze_500_sequences);
criterion_main!(benches);
