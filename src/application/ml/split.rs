//! Stratified train/test partitioning.

use crate::domain::errors::TrainingError;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;

/// Seed used when the caller does not pick one.
pub const DEFAULT_SEED: u64 = 42;

/// Row indices of each partition, both in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Largest-remainder allocation of `n_draws` across classes, proportional to
/// `counts`. Ties on the remainder go to the earlier class.
fn approximate_mode(counts: &[usize], n_draws: usize) -> Vec<usize> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return vec![0; counts.len()];
    }
    let continuous: Vec<f64> = counts
        .iter()
        .map(|c| *c as f64 * n_draws as f64 / total as f64)
        .collect();
    let mut allocated: Vec<usize> = continuous.iter().map(|c| c.floor() as usize).collect();

    let mut remaining = n_draws.saturating_sub(allocated.iter().sum());
    let mut order: Vec<usize> = (0..counts.len()).collect();
    order.sort_by(|a, b| {
        let ra = continuous[*a] - continuous[*a].floor();
        let rb = continuous[*b] - continuous[*b].floor();
        rb.total_cmp(&ra).then(a.cmp(b))
    });
    for idx in order {
        if remaining == 0 {
            break;
        }
        if allocated[idx] < counts[idx] {
            allocated[idx] += 1;
            remaining -= 1;
        }
    }
    allocated
}

/// Splits rows so that each class keeps its proportion in both partitions.
///
/// `test_size` is the fraction of rows held out; the test partition gets
/// `ceil(test_size * n)` rows. Partitions never overlap and together cover
/// every row. Shuffling inside each class is driven by `seed`, so the same
/// labels and seed always give the same split.
pub fn stratified_split(
    labels: &[i64],
    test_size: f64,
    seed: u64,
) -> Result<SplitIndices, TrainingError> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(TrainingError::InvalidSplit {
            reason: format!("test size must be in (0, 1), got {test_size}"),
        });
    }

    let n = labels.len();
    let n_test = (test_size * n as f64).ceil() as usize;
    let n_train = n.saturating_sub(n_test);

    let mut by_class: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (idx, label) in labels.iter().enumerate() {
        by_class.entry(*label).or_default().push(idx);
    }
    let n_classes = by_class.len();

    if n_train < n_classes || n_test < n_classes {
        return Err(TrainingError::InvalidSplit {
            reason: format!(
                "{n} rows give {n_train} train / {n_test} test rows, \
                 each partition needs at least {n_classes} (one per class)"
            ),
        });
    }
    if let Some((class, members)) = by_class.iter().find(|(_, members)| members.len() < 2) {
        return Err(TrainingError::InvalidSplit {
            reason: format!(
                "class {class} has only {} member(s), at least 2 are needed to stratify",
                members.len()
            ),
        });
    }

    let counts: Vec<usize> = by_class.values().map(Vec::len).collect();
    let train_quota = approximate_mode(&counts, n_train);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(n_train);
    let mut test = Vec::with_capacity(n_test);
    for (mut members, quota) in by_class.into_values().zip(train_quota) {
        members.shuffle(&mut rng);
        let (train_part, test_part) = members.split_at(quota);
        train.extend_from_slice(train_part);
        test.extend_from_slice(test_part);
    }
    train.sort_unstable();
    test.sort_unstable();

    Ok(SplitIndices { train, test })
}
