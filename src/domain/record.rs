//! Loosely typed token record as it appears in the NDJSON datasets.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One JSON object per dataset line. No schema is enforced; every accessor
/// tolerates absent or oddly typed fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Raw field value, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Numeric field. Anything that is not a JSON number reads as missing.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    /// Nested sub-object. Absent, null or non-object containers behave as an
    /// empty object, so lookups through them yield `None` instead of failing.
    pub fn nested(&self, key: &str) -> Option<&Map<String, Value>> {
        self.0.get(key).and_then(Value::as_object)
    }

    /// Numeric field inside a nested container.
    pub fn nested_number(&self, container: &str, key: &str) -> Option<f64> {
        self.nested(container)
            .and_then(|inner| inner.get(key))
            .and_then(Value::as_f64)
    }

    /// Raw value for output projection; absent fields become `null`.
    pub fn value_or_null(&self, key: &str) -> Value {
        self.0.get(key).cloned().unwrap_or(Value::Null)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}
