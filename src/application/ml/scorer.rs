//! Batch scoring of unlabeled records with a persisted model.

use super::predictor::RiskPredictor;
use crate::domain::errors::ModelError;
use crate::domain::ml::build_feature_rows;
use crate::domain::record::Record;
use crate::infrastructure::jsonl::{ensure_not_empty, load_jsonl, write_jsonl};
use crate::infrastructure::persistence::load_model;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::info;

/// One output line: identifying fields copied from the input plus the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    pub t: Value,
    pub address: Value,
    pub name: Value,
    pub model_score: f64,
}

/// Scores every record, one output per input in the same order.
pub fn score_records<P: RiskPredictor>(
    predictor: &P,
    records: &[Record],
) -> Result<Vec<ScoredRecord>, ModelError> {
    let rows = build_feature_rows(records);
    let scores = predictor.predict_proba(&rows)?;
    if scores.len() != records.len() {
        return Err(ModelError::Predict(format!(
            "{} returned {} scores for {} records",
            predictor.name(),
            scores.len(),
            records.len()
        )));
    }

    Ok(records
        .iter()
        .zip(scores)
        .map(|(record, model_score)| ScoredRecord {
            t: record.value_or_null("t"),
            address: record.value_or_null("address"),
            name: record.value_or_null("name"),
            model_score,
        })
        .collect())
}

/// Loads the dataset and model, scores, and writes NDJSON to `out`.
pub fn run_scoring(data: &Path, model_in: &Path, out: &Path) -> Result<Vec<ScoredRecord>> {
    info!("Loading scoring data from {:?}", data);
    let records = load_jsonl(data)?;
    ensure_not_empty(&records)?;

    let model = load_model(model_in)?;
    model.ensure_compatible()?;
    info!(
        "Loaded {} ({} trees) from {:?}",
        model.name(),
        model.classifier.n_trees(),
        model_in
    );

    let scored = score_records(&model, &records)?;
    write_jsonl(out, &scored)?;
    info!("Scored {} records into {:?}", scored.len(), out);
    Ok(scored)
}
