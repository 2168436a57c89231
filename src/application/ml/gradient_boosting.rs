//! Binary gradient-boosted tree classifier.
//!
//! Log-loss boosting on top of smartcore regression trees: every round fits a
//! depth-bounded tree to the residuals `y - p` of the current ensemble and
//! adds its output, scaled by the learning rate, to the raw log-odds score.

use crate::domain::errors::ModelError;
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_regressor::{
    DecisionTreeRegressor, DecisionTreeRegressorParameters,
};
use std::fmt;

type RegressionTree = DecisionTreeRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Keeps the initial log-odds finite when the train partition is very skewed.
const PROBABILITY_CLIP: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoostingParams {
    /// Number of boosting rounds
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: u16,
    /// Minimum rows on each side of a split
    pub min_samples_leaf: usize,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 5,
            min_samples_leaf: 20,
        }
    }
}

impl BoostingParams {
    fn tree_parameters(&self) -> DecisionTreeRegressorParameters {
        DecisionTreeRegressorParameters::default()
            .with_max_depth(self.max_depth)
            .with_min_samples_leaf(self.min_samples_leaf.max(1))
            .with_min_samples_split(2 * self.min_samples_leaf.max(1))
    }
}

#[derive(Serialize, Deserialize)]
pub struct GradientBoostedClassifier {
    params: BoostingParams,
    /// Log-odds of the positive class in the train partition
    base_score: f64,
    trees: Vec<RegressionTree>,
}

impl fmt::Debug for GradientBoostedClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GradientBoostedClassifier")
            .field("params", &self.params)
            .field("base_score", &self.base_score)
            .field("trees", &self.trees.len())
            .finish()
    }
}

pub(crate) fn to_matrix(rows: &[Vec<f64>]) -> Result<DenseMatrix<f64>, ModelError> {
    DenseMatrix::from_2d_vec(&rows.to_vec()).map_err(|e| ModelError::Matrix(e.to_string()))
}

fn sigmoid(raw: f64) -> f64 {
    1.0 / (1.0 + (-raw).exp())
}

impl GradientBoostedClassifier {
    /// Fits the ensemble. `y` holds 0/1 targets, one per row of `x`.
    pub fn fit(x: &[Vec<f64>], y: &[f64], params: BoostingParams) -> Result<Self, ModelError> {
        if x.is_empty() {
            return Err(ModelError::Fit("no training rows".to_string()));
        }
        if x.len() != y.len() {
            return Err(ModelError::Fit(format!(
                "{} rows but {} targets",
                x.len(),
                y.len()
            )));
        }
        if !params.learning_rate.is_finite() || params.learning_rate <= 0.0 {
            return Err(ModelError::Fit(format!(
                "learning rate must be positive and finite, got {}",
                params.learning_rate
            )));
        }
        // Non-finite cells break smartcore's split search and cannot be
        // written back out as JSON.
        if let Some((row, value)) = x
            .iter()
            .enumerate()
            .find_map(|(idx, row)| row.iter().find(|v| !v.is_finite()).map(|v| (idx, *v)))
        {
            return Err(ModelError::Fit(format!(
                "feature matrix holds non-finite value {value} in row {row}"
            )));
        }

        let matrix = to_matrix(x)?;
        let positive_rate = (y.iter().sum::<f64>() / y.len() as f64)
            .clamp(PROBABILITY_CLIP, 1.0 - PROBABILITY_CLIP);
        let base_score = (positive_rate / (1.0 - positive_rate)).ln();

        let mut raw = vec![base_score; y.len()];
        let mut trees = Vec::with_capacity(params.n_estimators);

        for _ in 0..params.n_estimators {
            let residuals: Vec<f64> = y
                .iter()
                .zip(raw.iter())
                .map(|(target, score)| target - sigmoid(*score))
                .collect();

            let tree = RegressionTree::fit(&matrix, &residuals, params.tree_parameters())
                .map_err(|e| ModelError::Fit(e.to_string()))?;
            let update = tree
                .predict(&matrix)
                .map_err(|e| ModelError::Predict(e.to_string()))?;

            for (score, step) in raw.iter_mut().zip(update.iter()) {
                *score += params.learning_rate * step;
            }
            trees.push(tree);
        }

        Ok(Self {
            params,
            base_score,
            trees,
        })
    }

    /// Raw log-odds per row.
    pub fn decision_function(&self, x: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        if x.is_empty() {
            return Ok(Vec::new());
        }
        let matrix = to_matrix(x)?;
        let mut raw = vec![self.base_score; x.len()];
        for tree in &self.trees {
            let update = tree
                .predict(&matrix)
                .map_err(|e| ModelError::Predict(e.to_string()))?;
            for (score, step) in raw.iter_mut().zip(update.iter()) {
                *score += self.params.learning_rate * step;
            }
        }
        Ok(raw)
    }

    /// Probability of the positive class per row.
    pub fn predict_proba(&self, x: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        Ok(self
            .decision_function(x)?
            .into_iter()
            .map(sigmoid)
            .collect())
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}
