//! Rug-pull risk scorer
//!
//! Applies a model written by `train_rugpull` to an unlabeled NDJSON dataset
//! and writes one `{t, address, name, model_score}` line per record.

use anyhow::Result;
use clap::Parser;
use rugpull_risk::application::ml::scorer::run_scoring;
use rugpull_risk::config::ObservabilityEnvConfig;
use rugpull_risk::infrastructure::observability::init_logging;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Score rug-pull risk model.", long_about = None)]
struct Args {
    /// Path to rugpull_samples.jsonl
    #[arg(long)]
    data: PathBuf,

    /// Trained model path
    #[arg(long)]
    model_in: PathBuf,

    /// Output JSONL with scores
    #[arg(long)]
    out: PathBuf,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging(&ObservabilityEnvConfig::from_env()?)?;

    let args = Args::parse();
    run_scoring(&args.data, &args.model_in, &args.out)?;
    Ok(())
}
