// Token records as read from NDJSON
pub mod record;

// Feature extraction, imputation and labels
pub mod ml;

// Domain-specific error types
pub mod errors;
