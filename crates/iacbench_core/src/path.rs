//! Dotted key paths into metric records.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::MetricRecord;

/// An ordered sequence of keys, written `overall.efficiency_score`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ScorePath {
    segments: Vec<String>,
}

impl ScorePath {
    /// Parse a dotted path. An empty string yields a path with no segments,
    /// which never resolves.
    pub fn parse(path: &str) -> Self {
        let segments = if path.is_empty() {
            Vec::new()
        } else {
            path.split('.').map(str::to_string).collect()
        };
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// True when the path has at least one segment and none of them is empty.
    pub fn is_well_formed(&self) -> bool {
        !self.segments.is_empty() && self.segments.iter().all(|s| !s.is_empty())
    }

    /// Walk the record one segment at a time.
    ///
    /// Returns `None` when a segment is missing or when a non-terminal
    /// segment does not hold an object.
    pub fn descend<'a>(&self, record: &'a MetricRecord) -> Option<&'a Value> {
        let (first, rest) = self.segments.split_first()?;
        let mut current = record.get(first)?;
        for segment in rest {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }
}

impl fmt::Display for ScorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl From<String> for ScorePath {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for ScorePath {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<ScorePath> for String {
    fn from(path: ScorePath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> MetricRecord {
        MetricRecord::from_value(value).unwrap()
    }

    #[test]
    fn test_single_segment() {
        let r = record(json!({"complexity_score": 42.5}));
        let path = ScorePath::parse("complexity_score");
        assert_eq!(path.descend(&r), Some(&json!(42.5)));
    }

    #[test]
    fn test_nested_segments() {
        let r = record(json!({"overall": {"efficiency_score": 71.2}}));
        let path = ScorePath::parse("overall.efficiency_score");
        assert_eq!(path.segments(), ["overall", "efficiency_score"]);
        assert_eq!(path.descend(&r), Some(&json!(71.2)));
    }

    #[test]
    fn test_non_object_intermediate() {
        let r = record(json!({"overall": 5}));
        assert_eq!(ScorePath::parse("overall.efficiency_score").descend(&r), None);
    }

    #[test]
    fn test_missing_segment() {
        let r = record(json!({"summary": {}}));
        assert_eq!(ScorePath::parse("summary.performance_score").descend(&r), None);
    }

    #[test]
    fn test_empty_path_never_resolves() {
        let path = ScorePath::parse("");
        assert!(!path.is_well_formed());
        assert_eq!(path.descend(&record(json!({"": 1}))), None);
        assert!(!ScorePath::parse("overall..score").is_well_formed());
    }

    #[test]
    fn test_serde_as_dotted_string() {
        let path = ScorePath::parse("security_assessment.security_score");
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"security_assessment.security_score\"");
        let back: ScorePath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }
}
