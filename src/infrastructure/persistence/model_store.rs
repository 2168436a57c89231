use crate::application::ml::RugPullModel;
use crate::application::ml::TrainingMetrics;
use crate::domain::errors::ModelError;
use crate::infrastructure::jsonl::create_parent_dir;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

fn io_error(path: &Path, source: std::io::Error) -> ModelError {
    ModelError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn serde_error(path: &Path, source: serde_json::Error) -> ModelError {
    ModelError::Serde {
        path: path.to_path_buf(),
        source,
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<(), ModelError> {
    create_parent_dir(path).map_err(|e| io_error(path, e))?;
    let mut writer = BufWriter::new(File::create(path).map_err(|e| io_error(path, e))?);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value).map_err(|e| serde_error(path, e))?;
        writer.write_all(b"\n").map_err(|e| io_error(path, e))?;
    } else {
        serde_json::to_writer(&mut writer, value).map_err(|e| serde_error(path, e))?;
    }
    writer.flush().map_err(|e| io_error(path, e))
}

/// Persists the fitted model as a single JSON document.
pub fn save_model(path: &Path, model: &RugPullModel) -> Result<(), ModelError> {
    write_json(path, model, false)
}

pub fn load_model(path: &Path) -> Result<RugPullModel, ModelError> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| serde_error(path, e))
}

/// Writes the metrics report as indented JSON.
pub fn write_metrics(path: &Path, metrics: &TrainingMetrics) -> Result<(), ModelError> {
    write_json(path, metrics, true)
}
