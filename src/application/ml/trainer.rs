//! Training pipeline: labels, stratified split, fit, evaluation, persistence.

use super::evaluation::{
    ClassificationReport, classification_report, roc_auc, threshold_predictions,
};
use super::gradient_boosting::{BoostingParams, GradientBoostedClassifier};
use super::model::RugPullModel;
use super::predictor::RiskPredictor;
use super::split::{DEFAULT_SEED, stratified_split};
use crate::domain::errors::TrainingError;
use crate::domain::ml::{FeatureRow, Imputer, build_feature_rows, build_labels, feature_names};
use crate::domain::record::Record;
use crate::infrastructure::jsonl::{ensure_not_empty, load_jsonl};
use crate::infrastructure::persistence::{save_model, write_metrics};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

pub const DEFAULT_LABEL_FIELD: &str = "rug_label";
pub const DEFAULT_TEST_SIZE: f64 = 0.2;

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingOptions {
    /// Record field holding the 0/1 label
    pub label_field: String,
    /// Fraction of labeled rows held out for evaluation
    pub test_size: f64,
    pub seed: u64,
    pub params: BoostingParams,
    pub imputer: Imputer,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            label_field: DEFAULT_LABEL_FIELD.to_string(),
            test_size: DEFAULT_TEST_SIZE,
            seed: DEFAULT_SEED,
            params: BoostingParams::default(),
            imputer: Imputer::default(),
        }
    }
}

/// Evaluation snapshot written next to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingMetrics {
    /// `None` (serialized as `null`) when the test partition holds one class
    pub auc: Option<f64>,
    pub report: ClassificationReport,
    pub features: Vec<String>,
    pub train_rows: usize,
    pub test_rows: usize,
}

#[derive(Debug)]
pub struct TrainingOutcome {
    pub model: RugPullModel,
    pub metrics: TrainingMetrics,
    /// Held-out rows and what the fitted model scored them, in row order
    pub test_rows: Vec<FeatureRow>,
    pub test_labels: Vec<i64>,
    pub test_probabilities: Vec<f64>,
}

/// Keeps rows whose label is present, truncating labels to integer classes.
fn labeled_rows(rows: Vec<FeatureRow>, labels: Vec<Option<f64>>) -> (Vec<FeatureRow>, Vec<i64>) {
    rows.into_iter()
        .zip(labels)
        .filter_map(|(row, label)| label.map(|value| (row, value.trunc() as i64)))
        .unzip()
}

fn validate_classes(
    label_field: &str,
    labels: &[i64],
) -> Result<BTreeMap<i64, usize>, TrainingError> {
    if labels.is_empty() {
        return Err(TrainingError::NoLabeledRows {
            label_field: label_field.to_string(),
        });
    }

    let mut balance: BTreeMap<i64, usize> = BTreeMap::new();
    for label in labels {
        *balance.entry(*label).or_default() += 1;
    }
    if balance.len() < 2 {
        return Err(TrainingError::SingleClass {
            classes: balance.len(),
        });
    }
    if let Some(class) = balance.keys().find(|class| !matches!(**class, 0 | 1)) {
        return Err(TrainingError::NonBinaryLabel { class: *class });
    }
    Ok(balance)
}

fn pick<T: Copy>(items: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|idx| items[*idx]).collect()
}

/// Fits and evaluates a classifier on `records`.
///
/// Rows without a usable label are dropped first. Fewer than two classes
/// aborts before any fitting, as does a non-finite fill value.
pub fn train_model(
    records: &[Record],
    options: &TrainingOptions,
) -> Result<TrainingOutcome, TrainingError> {
    options.imputer.validate()?;

    let labels = build_labels(records, &options.label_field);
    let (rows, labels) = labeled_rows(build_feature_rows(records), labels);

    let balance = validate_classes(&options.label_field, &labels)?;
    info!(
        "Labeled rows: {} of {} (class balance: {:?})",
        labels.len(),
        records.len(),
        balance
    );

    let split = stratified_split(&labels, options.test_size, options.seed)?;
    let train_rows = pick(&rows, &split.train);
    let train_labels: Vec<f64> = split.train.iter().map(|idx| labels[*idx] as f64).collect();
    let test_rows = pick(&rows, &split.test);
    let test_labels = pick(&labels, &split.test);

    let params = options.params;
    info!(
        "Training Gradient Boosted Trees on {} samples \
         (Rounds: {}, LR: {}, Depth: {}, MinLeaf: {})...",
        train_rows.len(),
        params.n_estimators,
        params.learning_rate,
        params.max_depth,
        params.min_samples_leaf
    );
    let x_train = options.imputer.fill_all(&train_rows);
    let classifier = GradientBoostedClassifier::fit(&x_train, &train_labels, params)?;
    let model = RugPullModel::new(options.imputer, classifier);

    let test_probabilities = model.predict_proba(&test_rows)?;
    let predictions = threshold_predictions(&test_probabilities);
    let report = classification_report(&test_labels, &predictions);
    let auc = roc_auc(&test_labels, &test_probabilities);

    match auc {
        Some(value) => info!(
            "OOS Test (n={}): AUC={:.4}, accuracy={:.4}",
            test_rows.len(),
            value,
            report.accuracy
        ),
        None => warn!(
            "OOS Test (n={}): AUC undefined, test partition holds a single class",
            test_rows.len()
        ),
    }

    let metrics = TrainingMetrics {
        auc,
        report,
        features: feature_names(),
        train_rows: train_rows.len(),
        test_rows: test_rows.len(),
    };

    Ok(TrainingOutcome {
        model,
        metrics,
        test_rows,
        test_labels,
        test_probabilities,
    })
}

/// Loads `data`, trains, then writes the model followed by the metrics.
pub fn run_training(
    data: &Path,
    model_out: &Path,
    metrics_out: &Path,
    options: &TrainingOptions,
) -> Result<TrainingOutcome> {
    info!("Loading training data from {:?}", data);
    let records = load_jsonl(data)?;
    ensure_not_empty(&records)?;

    let outcome = train_model(&records, options).context("Training failed")?;

    info!("Saving model to {:?}", model_out);
    save_model(model_out, &outcome.model)?;
    info!("Writing metrics to {:?}", metrics_out);
    write_metrics(metrics_out, &outcome.metrics)?;

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ModelError;
    use serde_json::json;

    fn dataset(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| {
                let rugged = i % 3 == 0;
                let value = if rugged {
                    json!({
                        "score": 0.1,
                        "rugRisk": {"score": 80 + (i % 5), "holdersPct": 90.0},
                        "momentum": {"pctShort": -20.0},
                        "rug_label": 1
                    })
                } else {
                    json!({
                        "score": 0.9,
                        "rugRisk": {"score": 10 + (i % 5), "holdersPct": 20.0},
                        "momentum": {"pctShort": 5.0},
                        "rug_label": 0
                    })
                };
                serde_json::from_value(value).unwrap()
            })
            .collect()
    }

    fn fast_options() -> TrainingOptions {
        TrainingOptions {
            params: BoostingParams {
                n_estimators: 20,
                learning_rate: 0.3,
                max_depth: 3,
                min_samples_leaf: 2,
            },
            ..TrainingOptions::default()
        }
    }

    #[test]
    fn test_train_model_reports_metrics() {
        let records = dataset(60);
        let outcome = train_model(&records, &fast_options()).unwrap();

        assert_eq!(outcome.metrics.train_rows + outcome.metrics.test_rows, 60);
        assert_eq!(outcome.metrics.test_rows, 12);
        assert_eq!(outcome.metrics.features, feature_names());
        assert_eq!(outcome.metrics.auc, Some(1.0));
        assert_eq!(outcome.test_probabilities.len(), 12);
        assert_eq!(outcome.metrics.report.classes["1"].support, 4);
    }

    #[test]
    fn test_unlabeled_rows_are_dropped() {
        let mut records = dataset(30);
        records.push(serde_json::from_value(json!({"score": 0.5})).unwrap());
        records.push(serde_json::from_value(json!({"score": 0.5, "rug_label": "n/a"})).unwrap());
        let outcome = train_model(&records, &fast_options()).unwrap();
        assert_eq!(outcome.metrics.train_rows + outcome.metrics.test_rows, 30);
    }

    #[test]
    fn test_single_class_aborts() {
        let records: Vec<Record> = (0..10)
            .map(|_| serde_json::from_value(json!({"score": 1.0, "rug_label": 0})).unwrap())
            .collect();
        let err = train_model(&records, &fast_options()).unwrap_err();
        assert!(matches!(err, TrainingError::SingleClass { classes: 1 }));
    }

    #[test]
    fn test_no_labels_aborts() {
        let records: Vec<Record> = (0..4)
            .map(|_| serde_json::from_value(json!({"score": 1.0})).unwrap())
            .collect();
        let err = train_model(&records, &fast_options()).unwrap_err();
        assert!(matches!(err, TrainingError::NoLabeledRows { .. }));
    }

    #[test]
    fn test_non_binary_labels_abort() {
        let records: Vec<Record> = [0, 1, 2, 0, 1, 2]
            .into_iter()
            .map(|label| serde_json::from_value(json!({"rug_label": label})).unwrap())
            .collect();
        let err = train_model(&records, &fast_options()).unwrap_err();
        assert!(matches!(err, TrainingError::NonBinaryLabel { class: 2 }));
    }

    #[test]
    fn test_non_finite_fill_value_aborts() {
        let records = dataset(30);
        for fill_value in [f64::NAN, f64::INFINITY] {
            let options = TrainingOptions {
                imputer: Imputer::constant(fill_value),
                ..fast_options()
            };
            let err = train_model(&records, &options).unwrap_err();
            assert!(matches!(
                err,
                TrainingError::Model(ModelError::NonFinite { .. })
            ));
        }
    }

    #[test]
    fn test_infinite_learning_rate_aborts() {
        let mut options = fast_options();
        options.params.learning_rate = f64::INFINITY;
        let err = train_model(&dataset(30), &options).unwrap_err();
        assert!(matches!(err, TrainingError::Model(ModelError::Fit(_))));
    }

    #[test]
    fn test_fractional_labels_truncate() {
        assert_eq!(
            labeled_rows(vec![FeatureRow::default(); 3], vec![Some(0.9), None, Some(1.0)]).1,
            vec![0, 1]
        );
    }
}
