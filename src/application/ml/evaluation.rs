//! Binary classification metrics for the held-out partition.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Probability at or above which a row is predicted positive.
pub const DECISION_THRESHOLD: f64 = 0.5;

pub fn threshold_predictions(probabilities: &[f64]) -> Vec<i64> {
    probabilities
        .iter()
        .map(|p| i64::from(*p >= DECISION_THRESHOLD))
        .collect()
}

/// Area under the ROC curve via the rank-sum statistic, averaging ranks over
/// tied scores. `None` when `y_true` lacks either class.
pub fn roc_auc(y_true: &[i64], scores: &[f64]) -> Option<f64> {
    let n_pos = y_true.iter().filter(|y| **y == 1).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 || y_true.len() != scores.len() {
        return None;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|a, b| scores[*a].total_cmp(&scores[*b]));

    let mut ranks = vec![0.0; scores.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }
        // Ranks are 1-based; tied block [start, end) shares the mean rank.
        let mean_rank = (start + end + 1) as f64 / 2.0;
        for idx in &order[start..end] {
            ranks[*idx] = mean_rank;
        }
        start = end;
    }

    let pos_rank_sum: f64 = y_true
        .iter()
        .zip(ranks.iter())
        .filter(|(y, _)| **y == 1)
        .map(|(_, r)| *r)
        .sum();
    let n_pos = n_pos as f64;
    let n_neg = n_neg as f64;
    Some((pos_rank_sum - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    #[serde(rename = "f1-score")]
    pub f1_score: f64,
    pub support: usize,
}

/// Per-class precision/recall/F1 plus accuracy and averages, keyed like
/// scikit-learn's dictionary report (`"0"`, `"1"`, `"accuracy"`,
/// `"macro avg"`, `"weighted avg"`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    #[serde(flatten)]
    pub classes: BTreeMap<String, ClassMetrics>,
    pub accuracy: f64,
    #[serde(rename = "macro avg")]
    pub macro_avg: ClassMetrics,
    #[serde(rename = "weighted avg")]
    pub weighted_avg: ClassMetrics,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// Builds the report over the union of labels seen in `y_true` and `y_pred`.
/// Undefined ratios (zero denominators) are reported as `0.0`.
pub fn classification_report(y_true: &[i64], y_pred: &[i64]) -> ClassificationReport {
    let mut labels: Vec<i64> = y_true.iter().chain(y_pred.iter()).copied().collect();
    labels.sort_unstable();
    labels.dedup();

    let total = y_true.len();
    let mut classes = BTreeMap::new();
    let mut per_class = Vec::with_capacity(labels.len());

    for label in &labels {
        let tp = y_true
            .iter()
            .zip(y_pred.iter())
            .filter(|(t, p)| **t == *label && **p == *label)
            .count();
        let predicted = y_pred.iter().filter(|p| **p == *label).count();
        let support = y_true.iter().filter(|t| **t == *label).count();

        let precision = ratio(tp, predicted);
        let recall = ratio(tp, support);
        let f1_score = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        let metrics = ClassMetrics {
            precision,
            recall,
            f1_score,
            support,
        };
        per_class.push(metrics);
        classes.insert(label.to_string(), metrics);
    }

    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();

    let n_labels = per_class.len().max(1) as f64;
    let macro_avg = ClassMetrics {
        precision: per_class.iter().map(|m| m.precision).sum::<f64>() / n_labels,
        recall: per_class.iter().map(|m| m.recall).sum::<f64>() / n_labels,
        f1_score: per_class.iter().map(|m| m.f1_score).sum::<f64>() / n_labels,
        support: total,
    };

    let total_weight = total.max(1) as f64;
    let weighted_avg = ClassMetrics {
        precision: per_class
            .iter()
            .map(|m| m.precision * m.support as f64)
            .sum::<f64>()
            / total_weight,
        recall: per_class
            .iter()
            .map(|m| m.recall * m.support as f64)
            .sum::<f64>()
            / total_weight,
        f1_score: per_class
            .iter()
            .map(|m| m.f1_score * m.support as f64)
            .sum::<f64>()
            / total_weight,
        support: total,
    };

    ClassificationReport {
        classes,
        accuracy: ratio(correct, total),
        macro_avg,
        weighted_avg,
    }
}
