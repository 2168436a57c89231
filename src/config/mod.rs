//! Configuration module for the rug-pull risk tools.
//!
//! Structured configuration loading from environment variables, organized by
//! concern: Training and Observability. Binaries load `.env` first and let
//! their command-line flags override what is found here.

mod observability_config;
mod training_config;

pub use observability_config::{LogFormat, ObservabilityEnvConfig};
pub use training_config::TrainingEnvConfig;
