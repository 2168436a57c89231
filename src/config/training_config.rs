//! Training configuration parsing from environment variables.
//!
//! Command-line flags take precedence over these values; these take
//! precedence over the built-in defaults.

use crate::application::ml::split::DEFAULT_SEED;
use crate::application::ml::trainer::DEFAULT_LABEL_FIELD;
use crate::application::ml::BoostingParams;
use crate::domain::ml::Imputer;
use anyhow::{Context, Result, bail};
use std::env;
use std::str::FromStr;

/// Training environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingEnvConfig {
    pub label_field: String,
    pub seed: u64,
    pub params: BoostingParams,
    pub imputer: Imputer,
}

impl Default for TrainingEnvConfig {
    fn default() -> Self {
        Self {
            label_field: DEFAULT_LABEL_FIELD.to_string(),
            seed: DEFAULT_SEED,
            params: BoostingParams::default(),
            imputer: Imputer::default(),
        }
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Failed to parse {}={:?}", key, raw)),
        None => Ok(default),
    }
}

/// Like [`parse_or`], but refuses NaN and infinities.
fn parse_finite_or<F>(lookup: &F, key: &str, default: f64) -> Result<f64>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_or(lookup, key, default)?;
    if !value.is_finite() {
        bail!("{} must be a finite number, got {}", key, value);
    }
    Ok(value)
}

impl TrainingEnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let params = BoostingParams {
            n_estimators: parse_or(
                &lookup,
                "RUGPULL_N_ESTIMATORS",
                defaults.params.n_estimators,
            )?,
            learning_rate: parse_finite_or(
                &lookup,
                "RUGPULL_LEARNING_RATE",
                defaults.params.learning_rate,
            )?,
            max_depth: parse_or(&lookup, "RUGPULL_MAX_DEPTH", defaults.params.max_depth)?,
            min_samples_leaf: parse_or(
                &lookup,
                "RUGPULL_MIN_SAMPLES_LEAF",
                defaults.params.min_samples_leaf,
            )?,
        };

        let fill_value = parse_or(&lookup, "RUGPULL_FILL_VALUE", defaults.imputer.fill_value)?;
        let imputer = Imputer::try_constant(fill_value).context("Invalid RUGPULL_FILL_VALUE")?;

        Ok(Self {
            label_field: lookup("RUGPULL_LABEL_FIELD").unwrap_or(defaults.label_field),
            seed: parse_or(&lookup, "RUGPULL_SEED", defaults.seed)?,
            params,
            imputer,
        })
    }
}
