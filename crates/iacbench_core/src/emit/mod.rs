//! Report output: JSON document, HTML page and plain-text summary.
//!
//! Writing is the one place where the comparison run can fail hard: a run
//! that produces no artifacts is reported to the caller as an error.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::{BenchError, BenchResult};
use crate::report::Report;

pub mod html;
pub mod text;

pub use html::render_html;
pub use text::render_summary_text;

pub const REPORT_JSON: &str = "report.json";
pub const REPORT_HTML: &str = "report.html";

/// Paths of the artifacts written for one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenReport {
    pub json: PathBuf,
    pub html: PathBuf,
}

/// Write `report.json` and `report.html` into `output_dir`, creating it if needed.
pub fn write_reports(report: &Report, output_dir: &Path) -> BenchResult<WrittenReport> {
    fs::create_dir_all(output_dir).map_err(|source| BenchError::OutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let json = output_dir.join(REPORT_JSON);
    write_json_pretty(&json, report)?;
    info!("Report saved to: {:?}", json);

    let html = output_dir.join(REPORT_HTML);
    write_text(&html, &render_html(report)?)?;
    info!("HTML report saved to: {:?}", html);

    Ok(WrittenReport { json, html })
}

/// Serialize `value` as pretty-printed JSON into `path`, creating parent directories.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> BenchResult<()> {
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    write_text(path, &content)
}

/// Write `content` into `path`, creating parent directories.
pub fn write_text(path: &Path, content: &str) -> BenchResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| BenchError::OutputDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, content).map_err(|source| BenchError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// First letter upper-cased, the rest lower-cased: `"terraform"` -> `"Terraform"`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
