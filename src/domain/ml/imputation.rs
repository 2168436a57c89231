use super::feature_registry::{FEATURE_COUNT, FeatureRow};
use crate::domain::errors::ModelError;
use serde::{Deserialize, Serialize};

/// Missing-value policy applied right before rows reach the model.
///
/// The default fills every missing cell with `0.0`. That conflates "absent"
/// with "zero" and is kept as-is for compatibility with existing models; pass a
/// different constant when training to change it. The constant is stored in
/// the model artifact so scoring always fills the same way training did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Imputer {
    pub fill_value: f64,
}

impl Default for Imputer {
    fn default() -> Self {
        Self { fill_value: 0.0 }
    }
}

impl Imputer {
    pub fn constant(fill_value: f64) -> Self {
        Self { fill_value }
    }

    /// Like [`Imputer::constant`], but refuses NaN and infinities, which can
    /// neither be split on nor persisted.
    pub fn try_constant(fill_value: f64) -> Result<Self, ModelError> {
        let imputer = Self::constant(fill_value);
        imputer.validate()?;
        Ok(imputer)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.fill_value.is_finite() {
            Ok(())
        } else {
            Err(ModelError::NonFinite {
                name: "fill value",
                value: self.fill_value,
            })
        }
    }

    pub fn fill(&self, row: &FeatureRow) -> [f64; FEATURE_COUNT] {
        row.values().map(|v| v.unwrap_or(self.fill_value))
    }

    /// Dense matrix rows, in input order.
    pub fn fill_all(&self, rows: &[FeatureRow]) -> Vec<Vec<f64>> {
        rows.iter().map(|row| self.fill(row).to_vec()).collect()
    }
}
