//! Placeholder training entrypoint for the trainer container.
//!
//! Mount datasets and models into the data/models directories; this binary
//! only reports whether they are present.

use anyhow::Result;
use clap::Parser;
use rugpull_risk::application::ml::mounts::{DEFAULT_DATA_DIR, DEFAULT_MODELS_DIR, inspect_mounts};
use rugpull_risk::config::ObservabilityEnvConfig;
use rugpull_risk::infrastructure::observability::init_logging;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Trainer container placeholder", long_about = None)]
struct Args {
    /// Dataset mount
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Models mount
    #[arg(long, default_value = DEFAULT_MODELS_DIR)]
    models_dir: PathBuf,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging(&ObservabilityEnvConfig::from_env()?)?;

    let args = Args::parse();
    let status = inspect_mounts(&args.data_dir, &args.models_dir);

    info!("Trainer container ready.");
    info!("Dataset mount: {:?} (exists={})", status.data.path, status.data.exists);
    info!("Models mount: {:?} (exists={})", status.models.path, status.models.exists);
    Ok(())
}
