//! Reading collaborator output files.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AnalysisError, AnalysisResult};

/// Read and parse a JSON file that must exist.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> AnalysisResult<T> {
    debug!("Reading {:?}", path);
    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            AnalysisError::MissingInput(path.to_path_buf())
        } else {
            AnalysisError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_json::from_str(&content).map_err(|e| AnalysisError::InvalidInput {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Read and parse a JSON file that may be absent.
///
/// Absent files yield `None` silently; unreadable ones are logged and also
/// yield `None`.
pub fn read_json_optional<T: DeserializeOwned>(path: &Path) -> Option<T> {
    if !path.exists() {
        debug!("Optional input not present: {:?}", path);
        return None;
    }
    match read_json(path) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring unreadable input {:?}: {}", path, e);
            None
        }
    }
}

/// Min/max/avg statistics of a sampled quantity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    #[serde(default)]
    pub min: f64,
    #[serde(default)]
    pub max: f64,
    #[serde(default)]
    pub avg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peak: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageSummary {
    #[serde(default)]
    pub cpu_percent: UsageStats,
    #[serde(default)]
    pub memory_mb: UsageStats,
}

/// Output of the resource monitor wrapped around one IaC command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceUsage {
    #[serde(default)]
    pub execution_time_seconds: f64,
    #[serde(default)]
    pub summary: UsageSummary,
}

/// Score in `0..=100` for a lower-is-better measurement: full marks at or
/// below `ideal`, decaying as `ideal / value` above it. Values below 1 are
/// treated as 1.
pub fn ideal_ratio_score(ideal: f64, value: f64) -> f64 {
    100.0 * (ideal / value.max(1.0)).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ideal_ratio_score() {
        assert_eq!(ideal_ratio_score(300.0, 150.0), 100.0);
        assert_eq!(ideal_ratio_score(300.0, 600.0), 50.0);
        assert_eq!(ideal_ratio_score(10.0, 0.0), 100.0);
        assert_eq!(ideal_ratio_score(0.5, 0.2), 50.0);
    }

    #[test]
    fn test_read_json_missing_and_invalid() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            read_json::<ResourceUsage>(&missing),
            Err(AnalysisError::MissingInput(_))
        ));
        assert!(read_json_optional::<ResourceUsage>(&missing).is_none());

        let invalid = dir.path().join("invalid.json");
        fs::write(&invalid, "not json").unwrap();
        assert!(matches!(
            read_json::<ResourceUsage>(&invalid),
            Err(AnalysisError::InvalidInput { .. })
        ));
        assert!(read_json_optional::<ResourceUsage>(&invalid).is_none());
    }

    #[test]
    fn test_resource_usage_defaults() {
        let usage: ResourceUsage = serde_json::from_str(
            r#"{"execution_time_seconds": 12.5, "summary": {"cpu_percent": {"max": 40.0}}}"#,
        )
        .unwrap();
        assert_eq!(usage.execution_time_seconds, 12.5);
        assert_eq!(usage.summary.cpu_percent.max, 40.0);
        assert_eq!(usage.summary.memory_mb, UsageStats::default());
    }
}
