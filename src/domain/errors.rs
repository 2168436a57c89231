use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a newline-delimited JSON dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read dataset {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON on line {line}: {source}")]
    MalformedLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Line {line} is not a JSON object")]
    NotAnObject { line: usize },

    #[error("No records found in dataset.")]
    Empty,
}

/// Errors raised by the training pipeline
#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("No records carry a usable '{label_field}' label")]
    NoLabeledRows { label_field: String },

    #[error("Labels must contain at least two classes (found {classes})")]
    SingleClass { classes: usize },

    #[error("Labels must be 0 or 1, found class {class}")]
    NonBinaryLabel { class: i64 },

    #[error("Invalid train/test split: {reason}")]
    InvalidSplit { reason: String },

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Errors raised while fitting, applying or persisting a model
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Matrix error: {0}")]
    Matrix(String),

    #[error("Training error: {0}")]
    Fit(String),

    #[error("Predict error: {0}")]
    Predict(String),

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("Model expects features {expected:?}, scorer provides {actual:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Model artifact I/O failed for {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Model artifact {path:?} could not be (de)serialized: {source}")]
    Serde {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
