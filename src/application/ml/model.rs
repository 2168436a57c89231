use super::gradient_boosting::GradientBoostedClassifier;
use super::predictor::RiskPredictor;
use crate::domain::errors::ModelError;
use crate::domain::ml::{FEATURE_COLUMNS, FeatureRow, Imputer, feature_names};
use serde::{Deserialize, Serialize};

/// Persisted rug-pull classifier: the fitted ensemble plus everything needed
/// to feed it rows the same way training did.
#[derive(Debug, Serialize, Deserialize)]
pub struct RugPullModel {
    /// Column order the ensemble was trained on
    pub features: Vec<String>,
    pub imputer: Imputer,
    pub classifier: GradientBoostedClassifier,
}

impl RugPullModel {
    pub fn new(imputer: Imputer, classifier: GradientBoostedClassifier) -> Self {
        Self {
            features: feature_names(),
            imputer,
            classifier,
        }
    }

    /// Fails when the model was trained on a different column list than the
    /// one this build flattens records into.
    pub fn ensure_compatible(&self) -> Result<(), ModelError> {
        if self.features.iter().map(String::as_str).eq(FEATURE_COLUMNS) {
            Ok(())
        } else {
            Err(ModelError::FeatureMismatch {
                expected: self.features.clone(),
                actual: feature_names(),
            })
        }
    }
}

impl RiskPredictor for RugPullModel {
    fn predict_proba(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, ModelError> {
        let matrix = self.imputer.fill_all(rows);
        self.classifier.predict_proba(&matrix)
    }

    fn name(&self) -> &str {
        "Gradient Boosted Trees"
    }
}
