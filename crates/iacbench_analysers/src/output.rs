//! Writing canonical metric records.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::AnalysisResult;

/// Write a metric record as pretty JSON, creating parent directories.
pub fn write_record<T: Serialize>(path: &Path, record: &T) -> AnalysisResult<()> {
    iacbench_core::write_json_pretty(path, record)?;
    info!("Record saved to: {:?}", path);
    Ok(())
}
