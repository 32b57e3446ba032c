//! Metrics, feature ranking and cost simulation.

use pdm_predictor::{
    config::{CostConfig, RiskConfig},
    dataset::{Dataset, DatasetFilter, StatusFilter},
    evaluation::{rank_features, ClassificationMetrics, ConfusionMatrix, CostImpact, Evaluator},
    features::{FeatureVector, QualityType, SensorReading},
    model::Classifier,
    pipeline::SplitArtifact,
};
use ndarray::Array2;

struct ByQuality;

impl Classifier for ByQuality {
    /// High quality always fails, everything else never does.
    fn probability(&self, features: &FeatureVector) -> f64 {
        if features.get(0) == 2.0 {
            0.9
        } else {
            0.1
        }
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn metrics_from_known_confusion() {
    let cm = ConfusionMatrix::new(8, 2, 87, 3);
    assert_eq!(cm.total(), 100);
    assert_eq!(cm.as_rows(), [[87, 2], [3, 8]]);
    let m = ClassificationMetrics::from_confusion(&cm);
    assert!(close(m.accuracy, 0.95));
    assert!(close(m.precision, 0.8));
    assert!(close(m.recall, 0.727));
    assert!(close(m.f1, 0.762));
}

#[test]
fn no_true_positives_gives_zero_f1() {
    let cm = ConfusionMatrix::new(0, 0, 90, 10);
    let m = ClassificationMetrics::from_confusion(&cm);
    assert_eq!(m.precision, 0.0);
    assert_eq!(m.recall, 0.0);
    assert_eq!(m.f1, 0.0);
    assert!(close(m.accuracy, 0.9));

    let empty = ClassificationMetrics::from_confusion(&ConfusionMatrix::default());
    assert_eq!(empty.accuracy, 0.0);
}

#[test]
fn confusion_from_labels() {
    let cm = ConfusionMatrix::from_labels(&[1, 1, 0, 0, 1], &[1, 0, 0, 1, 1]);
    assert_eq!(cm, ConfusionMatrix::new(2, 1, 1, 1));
}

#[test]
fn ranking_is_descending() {
    let names: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
    let ranked = rank_features(&names, &[0.2, 0.5, 0.3]);
    let order: Vec<&str> = ranked.iter().map(|f| f.feature.as_str()).collect();
    assert_eq!(order, ["b", "c", "a"]);
}

#[test]
fn cost_impact_counts_inspections_and_misses() {
    let cm = ConfusionMatrix::new(8, 2, 87, 3);
    let cost = CostImpact::simulate(&cm, &CostConfig::default());
    assert_eq!(cost.cost_without_model, 11.0 * 5000.0);
    assert_eq!(cost.cost_with_model, 10.0 * 50.0 + 3.0 * 5000.0);
    assert_eq!(cost.savings, cost.cost_without_model - cost.cost_with_model);
}

#[test]
fn evaluator_scores_every_test_row() {
    let test_features = Array2::from_shape_vec(
        (4, 6),
        vec![
            2.0, 0.0, 0.0, 0.0, 0.0, 0.0, //
            2.0, 0.0, 0.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, 0.0, 0.0, 0.0,
        ],
    )
    .unwrap();
    let split = SplitArtifact {
        feature_names: pdm_predictor::features::FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        train_features: Array2::zeros((0, 6)),
        train_labels: vec![],
        test_features,
        test_labels: vec![1, 0, 1, 0],
        train_rows: vec![],
        test_rows: vec![0, 1, 2, 3],
        test_size: 0.2,
        seed: 42,
    };
    let report = Evaluator::new(RiskConfig::default(), CostConfig::default())
        .evaluate(&ByQuality, &split)
        .unwrap();
    assert_eq!(report.test_rows, 4);
    assert_eq!(report.confusion, ConfusionMatrix::new(1, 1, 1, 1));
    assert_eq!(report.metrics.accuracy, 0.5);
    assert_eq!(report.threshold, 0.5);
    assert!(report.feature_importance.is_none());
}

fn profile_fixture() -> Dataset {
    let rows = vec![
        (SensorReading::new(QualityType::Low, 300.0, 310.0, 1500, 40.0, 10), 0),
        (SensorReading::new(QualityType::Low, 302.0, 311.0, 1400, 50.0, 220), 1),
        (SensorReading::new(QualityType::Medium, 298.0, 308.0, 1600, 30.0, 5), 0),
        (SensorReading::new(QualityType::High, 299.0, 309.0, 2800, 5.0, 100), 1),
    ];
    Dataset::from_records(&rows).unwrap()
}

#[test]
fn profile_of_whole_dataset() {
    let profile = profile_fixture().profile(&DatasetFilter::default());
    assert_eq!(profile.total_rows, 4);
    assert_eq!(profile.filtered_rows, 4);
    assert_eq!(profile.failures, 2);
    assert_eq!(profile.failure_rate, 0.5);
    assert_eq!(profile.per_quality["L"].rows, 2);
    assert_eq!(profile.per_quality["L"].failures, 1);
    assert_eq!(profile.per_quality["H"].failures, 1);

    let air = &profile.features[0];
    assert_eq!(air.min, 298.0);
    assert_eq!(air.max, 302.0);
    assert!(close(air.mean, 299.75));
    assert!(close(air.mean_failure.unwrap(), 300.5));
    assert!(close(air.mean_normal.unwrap(), 299.0));
}

#[test]
fn profile_filters_by_quality_and_status() {
    let data = profile_fixture();
    let failing_low = data.profile(&DatasetFilter {
        qualities: vec![QualityType::Low],
        status: StatusFilter::FailureOnly,
    });
    assert_eq!(failing_low.total_rows, 4);
    assert_eq!(failing_low.filtered_rows, 1);
    assert_eq!(failing_low.failure_rate, 1.0);
    assert!(failing_low.features[0].mean_normal.is_none());

    let none = data.profile(&DatasetFilter {
        qualities: vec![QualityType::Medium],
        status: StatusFilter::FailureOnly,
    });
    assert_eq!(none.filtered_rows, 0);
    assert_eq!(none.failure_rate, 0.0);
    assert!(none.features.is_empty());
}
