mod engine;

pub use engine::{Prediction, RiskEngine, RiskLevel};
