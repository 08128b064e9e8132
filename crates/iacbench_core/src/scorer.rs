//! Category score extraction.

use serde_json::Value;

use crate::path::ScorePath;
use crate::record::MetricRecord;

/// Numeric score at `path`, if the path resolves to a number.
pub fn extract_score(record: &MetricRecord, path: &ScorePath) -> Option<f64> {
    path.descend(record).and_then(Value::as_f64)
}

/// Score of a record for its category.
///
/// Scores are advisory: an unresolvable path or a non-numeric terminal value
/// scores `0.0`.
pub fn score_record(record: &MetricRecord, path: &ScorePath) -> f64 {
    extract_score(record, path).unwrap_or(0.0)
}
