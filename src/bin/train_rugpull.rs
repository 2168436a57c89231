//! Rug-pull risk trainer
//!
//! Fits a gradient-boosted classifier on a labeled NDJSON dataset and writes
//! the model plus a metrics report.
//!
//! # Usage
//! ```sh
//! cargo run --bin train_rugpull -- --data data/rugpull_samples.jsonl
//! ```
//!
//! # Environment Variables
//! - `RUGPULL_SEED`, `RUGPULL_N_ESTIMATORS`, `RUGPULL_LEARNING_RATE`,
//!   `RUGPULL_MAX_DEPTH`, `RUGPULL_MIN_SAMPLES_LEAF`, `RUGPULL_FILL_VALUE` -
//!   defaults for the matching flags
//! - `LOG_LEVEL`, `LOG_FORMAT` - logging (`RUST_LOG` overrides the level)

use anyhow::{Context, Result};
use clap::Parser;
use rugpull_risk::application::ml::BoostingParams;
use rugpull_risk::application::ml::trainer::{DEFAULT_TEST_SIZE, TrainingOptions, run_training};
use rugpull_risk::config::{ObservabilityEnvConfig, TrainingEnvConfig};
use rugpull_risk::domain::ml::Imputer;
use rugpull_risk::infrastructure::observability::init_logging;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Train a rug-pull risk classifier.", long_about = None)]
struct Args {
    /// Path to rugpull_samples.jsonl
    #[arg(long)]
    data: PathBuf,

    /// JSON field containing 0/1 labels
    #[arg(long)]
    label_field: Option<String>,

    /// Output model path
    #[arg(long, default_value = "rugpull_model.joblib")]
    model_out: PathBuf,

    /// Metrics JSON output
    #[arg(long, default_value = "metrics.json")]
    metrics_out: PathBuf,

    /// Test split size
    #[arg(long, default_value_t = DEFAULT_TEST_SIZE)]
    test_size: f64,

    /// Seed for the stratified split
    #[arg(long)]
    seed: Option<u64>,

    /// Value substituted for missing feature cells
    #[arg(long, value_parser = finite_f64, allow_negative_numbers = true)]
    fill_value: Option<f64>,

    /// Number of boosting rounds
    #[arg(long)]
    n_estimators: Option<usize>,

    /// Shrinkage applied to each tree
    #[arg(long, value_parser = finite_f64)]
    learning_rate: Option<f64>,

    /// Maximum depth of trees
    #[arg(long)]
    max_depth: Option<u16>,

    /// Minimum samples on each side of a split
    #[arg(long)]
    min_samples_leaf: Option<usize>,
}

/// Float flags that end up inside the persisted model must be finite.
fn finite_f64(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("must be a finite number, got {value}"))
    }
}

impl Args {
    fn into_options(self, env: TrainingEnvConfig) -> TrainingOptions {
        let params = BoostingParams {
            n_estimators: self.n_estimators.unwrap_or(env.params.n_estimators),
            learning_rate: self.learning_rate.unwrap_or(env.params.learning_rate),
            max_depth: self.max_depth.unwrap_or(env.params.max_depth),
            min_samples_leaf: self.min_samples_leaf.unwrap_or(env.params.min_samples_leaf),
        };
        TrainingOptions {
            label_field: self.label_field.unwrap_or(env.label_field),
            test_size: self.test_size,
            seed: self.seed.unwrap_or(env.seed),
            params,
            imputer: self
                .fill_value
                .map(Imputer::constant)
                .unwrap_or(env.imputer),
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging(&ObservabilityEnvConfig::from_env()?)?;

    let args = Args::parse();
    let data = args.data.clone();
    let model_out = args.model_out.clone();
    let metrics_out = args.metrics_out.clone();

    let env = TrainingEnvConfig::from_env().context("Invalid training configuration")?;
    let options = args.into_options(env);

    let outcome = run_training(&data, &model_out, &metrics_out, &options)?;

    info!(
        "Done. Model ({} train / {} test rows) saved to {:?}, metrics to {:?}",
        outcome.metrics.train_rows, outcome.metrics.test_rows, model_out, metrics_out
    );
    Ok(())
}
