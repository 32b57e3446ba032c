//! Binary classification metrics from a 2×2 confusion matrix.

use serde::{Deserialize, Serialize};

/// Counts of predicted vs. actual outcomes; class 1 (failure) is positive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_positive: usize,
    pub false_positive: usize,
    pub true_negative: usize,
    pub false_negative: usize,
}

impl ConfusionMatrix {
    pub fn new(true_positive: usize, false_positive: usize, true_negative: usize, false_negative: usize) -> Self {
        Self {
            true_positive,
            false_positive,
            true_negative,
            false_negative,
        }
    }

    /// Tally paired labels. Extra entries on the longer side are ignored.
    pub fn from_labels(y_true: &[u8], y_pred: &[u8]) -> Self {
        let mut cm = Self::default();
        for (&t, &p) in y_true.iter().zip(y_pred) {
            match (t == 1, p == 1) {
                (true, true) => cm.true_positive += 1,
                (false, true) => cm.false_positive += 1,
                (false, false) => cm.true_negative += 1,
                (true, false) => cm.false_negative += 1,
            }
        }
        cm
    }

    pub fn total(&self) -> usize {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }

    /// Rows are actual (negative, positive), columns predicted (negative, positive).
    pub fn as_rows(&self) -> [[usize; 2]; 2] {
        [
            [self.true_negative, self.false_positive],
            [self.false_negative, self.true_positive],
        ]
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl ClassificationMetrics {
    /// Any 0/0 ratio is reported as 0.
    pub fn from_confusion(cm: &ConfusionMatrix) -> Self {
        let accuracy = ratio(cm.true_positive + cm.true_negative, cm.total());
        let precision = ratio(cm.true_positive, cm.true_positive + cm.false_positive);
        let recall = ratio(cm.true_positive, cm.true_positive + cm.false_negative);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self {
            accuracy,
            precision,
            recall,
            f1,
        }
    }
}
