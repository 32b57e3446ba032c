//! Scoring, risk banding and diagnostics against fixed transforms and stub classifiers.

use pdm_predictor::{
    config::{InputConfig, InputPolicy, RiskConfig},
    error::SchemaError,
    features::{schema, FeatureVector, FittedTransform, QualityType, SensorReading},
    model::Classifier,
    risk::{RiskEngine, RiskLevel},
    scoring::{Diagnostics, Scorer},
};
use std::sync::Arc;

/// Returns the same probability for every input.
struct Fixed(f64);

impl Classifier for Fixed {
    fn probability(&self, _features: &FeatureVector) -> f64 {
        self.0
    }
}

fn reference_transform() -> FittedTransform {
    FittedTransform::from_parameters([298.0, 309.5, 1500.0, 40.0, 100.0], [2.0, 2.0, 150.0, 10.0, 80.0])
}

fn scorer(p: f64) -> Scorer {
    Scorer::new(Arc::new(reference_transform()), Arc::new(Fixed(p)), RiskConfig::default())
}

fn reading() -> SensorReading {
    SensorReading::new(QualityType::High, 298.5, 309.0, 1550, 42.0, 12)
}

#[test]
fn encode_known_symbols() {
    assert_eq!(schema::encode("L").unwrap(), 0);
    assert_eq!(schema::encode("M").unwrap(), 1);
    assert_eq!(schema::encode("H").unwrap(), 2);
    assert_eq!(
        schema::encode("h").unwrap_err(),
        SchemaError::UnknownCategory { symbol: "h".into() }
    );
    assert!(schema::encode("").is_err());
    assert_eq!("M".parse::<QualityType>().unwrap(), QualityType::Medium);
    for q in QualityType::ALL {
        assert_eq!(QualityType::from_code(q.code()), Some(q));
    }
}

#[test]
fn standardizes_reading_in_canonical_order() {
    let v = scorer(0.3).standardize(&reading()).unwrap();
    let expected = [2.0, 0.25, -0.25, 50.0 / 150.0, 0.2, -1.1];
    for (got, want) in v.as_slice().iter().zip(expected) {
        assert!((got - want).abs() < 1e-9, "{got} vs {want}");
    }
}

#[test]
fn low_probability_gives_no_failure() {
    let p = scorer(0.3).score(&reading()).unwrap();
    assert_eq!(p.failure_probability, 0.3);
    assert_eq!(p.decision, 0);
    assert!(!p.is_failure());
    assert_eq!(p.risk_level, RiskLevel::Low);
    assert_eq!(p.threshold, 0.5);
}

#[test]
fn decision_is_strictly_above_threshold() {
    assert_eq!(scorer(0.5).score(&reading()).unwrap().decision, 0);
    assert_eq!(scorer(0.5001).score(&reading()).unwrap().decision, 1);
    assert_eq!(scorer(0.9).score(&reading()).unwrap().risk_level, RiskLevel::High);
    assert_eq!(scorer(0.45).score(&reading()).unwrap().risk_level, RiskLevel::Medium);
}

#[test]
fn threshold_is_configurable() {
    let risk = RiskConfig {
        decision_threshold: 0.2,
        ..RiskConfig::default()
    };
    let s = Scorer::new(Arc::new(reference_transform()), Arc::new(Fixed(0.3)), risk);
    let p = s.score(&reading()).unwrap();
    assert_eq!(p.decision, 1);
    assert_eq!(p.threshold, 0.2);

    let engine = RiskEngine::new(RiskConfig {
        decision_threshold: 0.9,
        ..RiskConfig::default()
    });
    assert_eq!(engine.decision(0.85), 0);
}

#[test]
fn unknown_quality_is_rejected_before_scoring() {
    let mut r = reading();
    r.quality = "Q".into();
    assert_eq!(
        scorer(0.3).score(&r).unwrap_err(),
        SchemaError::UnknownCategory { symbol: "Q".into() }
    );
}

#[test]
fn accept_policy_passes_out_of_range_values() {
    let r = SensorReading::new(QualityType::Low, 500.0, 309.5, 1500, 40.0, 100);
    let v = scorer(0.3).standardize(&r).unwrap();
    assert!((v.get(1) - 101.0).abs() < 1e-9);
}

#[test]
fn clamp_policy_pulls_values_into_range() {
    let input = InputConfig {
        policy: InputPolicy::Clamp,
        ..InputConfig::default()
    };
    let s = scorer(0.3).with_input(input.clone());
    let r = SensorReading::new(QualityType::Low, 500.0, 309.5, 1500, 40.0, 100);
    let v = s.standardize(&r).unwrap();
    let max_air = input.ranges.air_temperature.max;
    assert!((v.get(1) - (max_air - 298.0) / 2.0).abs() < 1e-9);
    assert!(v.get(2).abs() < 1e-9);
}

#[test]
fn reject_policy_refuses_out_of_range_values() {
    let input = InputConfig {
        policy: InputPolicy::Reject,
        ..InputConfig::default()
    };
    let s = scorer(0.3).with_input(input);
    let r = SensorReading::new(QualityType::Low, 298.0, 309.5, 9000, 40.0, 100);
    match s.score(&r).unwrap_err() {
        SchemaError::OutOfRange { feature, value, .. } => {
            assert_eq!(feature, schema::ROTATIONAL_SPEED_COLUMN);
            assert_eq!(value, 9000.0);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(s.score(&reading()).is_ok());
}

#[test]
fn constant_feature_scales_by_one() {
    use ndarray::array;
    let x = array![
        [0.0, 300.0, 310.0, 1500.0, 40.0, 10.0],
        [1.0, 302.0, 310.0, 1600.0, 50.0, 30.0],
    ];
    let t = FittedTransform::fit(x.view()).unwrap();
    assert_eq!(t.features[1].std, 1.0);
    assert_eq!(t.features[0].mean, 301.0);
    assert_eq!(t.features[0].std, 1.0);
    let out = t.transform(x.view()).unwrap();
    assert_eq!(out[[1, 0]], 1.0);
    assert_eq!(out[[0, 2]], 0.0);
}

#[test]
fn transform_rejects_wrong_width() {
    let x = ndarray::Array2::<f64>::zeros((3, 5));
    assert_eq!(
        FittedTransform::fit(x.view()).unwrap_err(),
        SchemaError::WidthMismatch { expected: 6, found: 5 }
    );
    assert!(FeatureVector::from_slice(&[1.0, 2.0]).is_err());
}

#[test]
fn diagnostics_follow_reading() {
    let d = Diagnostics::from_reading(&SensorReading::new(QualityType::Low, 300.0, 310.5, 1500, 40.0, 230));
    assert!((d.power_strain_kw - 60.0).abs() < 1e-9);
    assert!((d.temperature_delta - 10.5).abs() < 1e-9);
    assert_eq!(d.tool_life_remaining, -30);
}
