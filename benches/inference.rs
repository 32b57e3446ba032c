//! Scoring benchmark: raw reading → standardize → forest probability → decision.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pdm_predictor::config::{ForestConfig, RiskConfig, SplitConfig};
use pdm_predictor::dataset::synthetic;
use pdm_predictor::features::{QualityType, SensorReading};
use pdm_predictor::model::Classifier;
use pdm_predictor::pipeline::{Preprocessor, Trainer};
use pdm_predictor::scoring::Scorer;
use std::sync::Arc;

fn fitted_scorer(n_estimators: usize) -> Scorer {
    let dataset = synthetic::synthetic_dataset(2_000, 42).unwrap();
    let prepared = Preprocessor::new(SplitConfig::default()).fit(&dataset).unwrap();
    let forest = Trainer::new(ForestConfig {
        n_estimators,
        ..ForestConfig::default()
    })
    .fit(&prepared.split)
    .unwrap();
    Scorer::new(Arc::new(prepared.transform), Arc::new(forest), RiskConfig::default())
}

fn bench_score_reading(c: &mut Criterion) {
    let scorer = fitted_scorer(100);
    let reading = SensorReading::new(QualityType::Low, 302.0, 310.5, 1300, 65.0, 230);

    c.bench_function("score_reading_100_trees", |b| {
        b.iter(|| scorer.score(black_box(&reading)).unwrap())
    });
}

fn bench_score_by_forest_size(c: &mut Criterion) {
    let reading = SensorReading::new(QualityType::Medium, 300.0, 310.0, 1550, 42.0, 120);

    let mut g = c.benchmark_group("score_by_trees");
    for n in [10, 50, 100, 200] {
        let scorer = fitted_scorer(n);
        g.bench_function(format!("trees_{}", n).as_str(), |b| {
            b.iter(|| scorer.score(black_box(&reading)).unwrap())
        });
    }
    g.finish();
}

fn bench_batch_probabilities(c: &mut Criterion) {
    let dataset = synthetic::synthetic_dataset(2_000, 7).unwrap();
    let prepared = Preprocessor::new(SplitConfig::default()).fit(&dataset).unwrap();
    let forest = Trainer::new(ForestConfig::default()).fit(&prepared.split).unwrap();

    c.bench_function("test_split_probabilities", |b| {
        b.iter(|| forest.probabilities(black_box(prepared.split.test_features.view())).unwrap())
    });
}

criterion_group!(benches, bench_score_reading, bench_score_by_forest_size, bench_batch_probabilities);
criterion_main!(benches);
