//! Raw per-tool, per-category measurement documents.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::path::ScorePath;

/// A metric document as written by a category analyser.
///
/// The mapping is kept verbatim (key order included) and is not modified
/// after loading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricRecord(Map<String, Value>);

impl MetricRecord {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Build a record from a JSON value; anything but an object is rejected.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Value at a dotted path.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        ScorePath::parse(path).descend(self)
    }

    /// Numeric value at a dotted path.
    pub fn number(&self, path: &str) -> Option<f64> {
        self.lookup(path).and_then(Value::as_f64)
    }

    /// String value at a dotted path.
    pub fn text(&self, path: &str) -> Option<&str> {
        self.lookup(path).and_then(Value::as_str)
    }

    /// Length of the array at a dotted path.
    pub fn array_len(&self, path: &str) -> Option<usize> {
        self.lookup(path).and_then(Value::as_array).map(Vec::len)
    }
}

impl From<Map<String, Value>> for MetricRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
