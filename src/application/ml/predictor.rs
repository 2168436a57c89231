use crate::domain::errors::ModelError;
use crate::domain::ml::FeatureRow;

/// Interface for rug-pull risk models
pub trait RiskPredictor {
    /// Probability (0.0 to 1.0) that each row is a rug-pull, in input order.
    /// Implementations apply their own missing-value policy.
    fn predict_proba(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, ModelError>;

    /// Get model name/type
    fn name(&self) -> &str;
}
