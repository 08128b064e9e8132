//! Metric file loading.
//!
//! A missing or unreadable metric file is an expected condition: the tool
//! simply has no data for that category. Nothing in this module fails.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, error, warn};

use crate::category::Category;
use crate::config::InputLayout;
use crate::record::MetricRecord;

/// What happened when a metric file was read.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(MetricRecord),
    Missing,
    Malformed(String),
}

impl LoadOutcome {
    /// The loaded record, if the file was readable.
    pub fn into_record(self) -> Option<MetricRecord> {
        match self {
            LoadOutcome::Loaded(record) => Some(record),
            LoadOutcome::Missing | LoadOutcome::Malformed(_) => None,
        }
    }
}

/// Read a metric file, reporting why it could not be used.
pub fn load_record(path: &Path) -> LoadOutcome {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Metric file not found: {:?}", path);
            return LoadOutcome::Missing;
        }
        Err(e) => {
            error!("Failed to read metric file {:?}: {}", path, e);
            return LoadOutcome::Malformed(e.to_string());
        }
    };

    match serde_json::from_str::<serde_json::Value>(&content) {
        Ok(value) => match MetricRecord::from_value(value) {
            Some(record) => {
                debug!("Loaded metric file {:?} ({} keys)", path, record.as_map().len());
                LoadOutcome::Loaded(record)
            }
            None => {
                error!("Metric file {:?} is not a JSON object", path);
                LoadOutcome::Malformed("document is not a JSON object".to_string())
            }
        },
        Err(e) => {
            error!("Invalid JSON in metric file {:?}: {}", path, e);
            LoadOutcome::Malformed(e.to_string())
        }
    }
}

/// Read a metric file, falling back to an empty record.
pub fn load_or_default(path: &Path) -> MetricRecord {
    load_record(path).into_record().unwrap_or_default()
}

/// Load the record of `tool` for `category` according to `layout`.
///
/// A category without a configured directory counts as missing.
pub fn load_tool_record(layout: &InputLayout, category: Category, tool: &str) -> LoadOutcome {
    match layout.record_path(category, tool) {
        Some(path) => load_record(&path),
        None => {
            warn!("No results directory configured for {}", category);
            LoadOutcome::Missing
        }
    }
}
