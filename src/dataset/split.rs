//! Stratified, seeded train/test partitioning.

use crate::error::PipelineError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Row membership of each partition, as indices into the source dataset (ascending).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Partition rows so that both sides keep the label proportions of the whole set.
///
/// The test side receives `ceil(n * test_size)` rows, allocated to each class by
/// its share (floor first, leftovers to the largest fractional remainders, ties
/// to the lower class). Each class is shuffled with a `StdRng` seeded from `seed`,
/// so identical labels and seed always yield identical partitions.
pub fn stratified_split(labels: &[u8], test_size: f64, seed: u64) -> Result<SplitIndices, PipelineError> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(PipelineError::InvalidSplit(format!(
            "test_size must be in (0, 1), got {test_size}"
        )));
    }
    let n = labels.len();
    let n_test = (n as f64 * test_size).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(PipelineError::InvalidSplit(format!(
            "{n} rows cannot be split with test_size {test_size}"
        )));
    }

    let mut by_class: Vec<Vec<usize>> = vec![Vec::new(); 2];
    for (idx, &label) in labels.iter().enumerate() {
        by_class[usize::from(label.min(1))].push(idx);
    }

    let mut allocation: Vec<usize> = Vec::with_capacity(by_class.len());
    let mut remainders: Vec<(f64, usize)> = Vec::new();
    for (class, members) in by_class.iter().enumerate() {
        let exact = members.len() as f64 * n_test as f64 / n as f64;
        allocation.push(exact.floor() as usize);
        remainders.push((exact - exact.floor(), class));
    }
    let mut leftover = n_test - allocation.iter().sum::<usize>();
    remainders.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
    for &(_, class) in &remainders {
        if leftover == 0 {
            break;
        }
        if allocation[class] < by_class[class].len() {
            allocation[class] += 1;
            leftover -= 1;
        }
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(n - n_test);
    let mut test = Vec::with_capacity(n_test);
    for (members, take) in by_class.iter_mut().zip(allocation) {
        members.shuffle(&mut rng);
        test.extend_from_slice(&members[..take]);
        train.extend_from_slice(&members[take..]);
    }
    train.sort_unstable();
    test.sort_unstable();

    Ok(SplitIndices { train, test })
}
