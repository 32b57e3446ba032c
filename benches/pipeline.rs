//! Offline pipeline benchmark: CSV parse, stratified split + standardization, forest fit.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pdm_predictor::config::{ForestConfig, SplitConfig};
use pdm_predictor::dataset::{synthetic, Dataset};
use pdm_predictor::pipeline::{Preprocessor, Trainer};

fn bench_parse_csv(c: &mut Criterion) {
    let csv = synthetic::raw_csv(&synthetic::synthetic_rows(10_000, 42));

    c.bench_function("parse_raw_csv_10k", |b| {
        b.iter(|| Dataset::from_reader(black_box(csv.as_bytes())).unwrap())
    });
}

fn bench_preprocess(c: &mut Criterion) {
    let dataset = synthetic::synthetic_dataset(10_000, 42).unwrap();
    let preprocessor = Preprocessor::new(SplitConfig::default());

    c.bench_function("split_and_standardize_10k", |b| {
        b.iter(|| preprocessor.fit(black_box(&dataset)).unwrap())
    });
}

fn bench_forest_fit(c: &mut Criterion) {
    let dataset = synthetic::synthetic_dataset(2_000, 42).unwrap();
    let prepared = Preprocessor::new(SplitConfig::default()).fit(&dataset).unwrap();

    let mut g = c.benchmark_group("forest_fit_2k");
    g.sample_size(10);
    for n in [10, 50] {
        let trainer = Trainer::new(ForestConfig {
            n_estimators: n,
            ..ForestConfig::default()
        });
        g.bench_function(format!("trees_{}", n).as_str(), |b| {
            b.iter(|| trainer.fit(black_box(&prepared.split)).unwrap())
        });
    }
    g.finish();
}

criterion_group!(benches, bench_parse_csv, bench_preprocess, bench_forest_fit);
criterion_main!(benches);
