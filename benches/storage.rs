//! Artifact storage benchmark: checksummed write, verified read, cache hit.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pdm_predictor::config::{ForestConfig, SplitConfig};
use pdm_predictor::dataset::synthetic;
use pdm_predictor::model::RandomForest;
use pdm_predictor::pipeline::{Preprocessor, Trainer};
use pdm_predictor::storage::{ArtifactCache, ArtifactKind, ArtifactStore};
use tempfile::tempdir;

fn fitted() -> (pdm_predictor::pipeline::PreparedData, RandomForest) {
    let dataset = synthetic::synthetic_dataset(2_000, 42).unwrap();
    let prepared = Preprocessor::new(SplitConfig::default()).fit(&dataset).unwrap();
    let forest = Trainer::new(ForestConfig::default()).fit(&prepared.split).unwrap();
    (prepared, forest)
}

fn bench_save_classifier(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let store = ArtifactStore::new(dir.path().join("models"), dir.path().join("processed"));
    let (_, forest) = fitted();

    c.bench_function("storage_save_classifier", |b| {
        b.iter(|| store.save_classifier(black_box(&forest)).unwrap())
    });
}

fn bench_load_classifier(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let store = ArtifactStore::new(dir.path().join("models"), dir.path().join("processed"));
    let (prepared, forest) = fitted();
    store.save_classifier(&forest).unwrap();
    store.save_transform(&prepared.transform).unwrap();

    c.bench_function("storage_load_classifier", |b| {
        b.iter(|| black_box(store.load_classifier()).unwrap())
    });
    c.bench_function("storage_load_transform", |b| {
        b.iter(|| black_box(store.load_transform()).unwrap())
    });
}

fn bench_cache_hit(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let store = ArtifactStore::new(dir.path().join("models"), dir.path().join("processed"));
    let (_, forest) = fitted();
    store.save_classifier(&forest).unwrap();
    let cache = ArtifactCache::new();
    let path = store.classifier_path();

    c.bench_function("storage_cache_hit_classifier", |b| {
        b.iter(|| {
            cache
                .get_or_load::<RandomForest>(black_box(&path), ArtifactKind::Classifier)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_save_classifier, bench_load_classifier, bench_cache_hit);
criterion_main!(benches);
