use crate::domain::record::Record;
use serde_json::Value;

/// Reads the label field of every record, preserving order.
///
/// Numbers are taken as-is and booleans map to 1/0. Absent or non-numeric
/// labels come back as `None` and are filtered out later by the trainer.
pub fn build_labels(records: &[Record], label_field: &str) -> Vec<Option<f64>> {
    records
        .iter()
        .map(|record| match record.get(label_field) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        })
        .collect()
}
