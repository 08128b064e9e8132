//! # iacbench_core
//!
//! Scoring and ranking core for comparing Infrastructure-as-Code tools.
//!
//! This crate provides:
//! - **Metric loading**: per-tool, per-category JSON records that degrade to
//!   an empty record when missing or malformed
//! - **Scoring**: one number per (tool, category) through a dotted key path
//! - **Ranking**: stable per-category ranks and a weighted overall ranking
//! - **Emitting**: `report.json`, `report.html` and a plain-text summary
//!
//! ## Example
//!
//! ```rust,no_run
//! use iacbench_core::{write_reports, BenchConfig, InputLayout, Report};
//! use std::path::Path;
//!
//! let config = BenchConfig::default();
//! let layout = InputLayout::under_root("results");
//!
//! let report = Report::build(&config, &layout);
//! write_reports(&report, Path::new("results/final")).unwrap();
//!
//! for (tool, entry) in &report.overall_ranking {
//!     println!("#{} {} ({:.2})", entry.rank, tool, entry.score);
//! }
//! ```

pub mod category;
pub mod config;
pub mod emit;
pub mod error;
pub mod findings;
pub mod loader;
pub mod path;
pub mod ranking;
pub mod record;
pub mod report;
pub mod scorer;

pub use category::Category;
pub use config::{BenchConfig, CategorySpec, InputLayout, DEFAULT_TOOLS};
pub use emit::{render_html, render_summary_text, write_json_pretty, write_reports, WrittenReport};
pub use error::{BenchError, BenchResult};
pub use findings::{key_findings, tool_strengths};
pub use loader::{load_or_default, load_record, LoadOutcome};
pub use path::ScorePath;
pub use ranking::{overall_ranking, rank_category, rank_points, round2, CategoryScore, Ranking};
pub use record::MetricRecord;
pub use report::{Report, ToolResults};
pub use scorer::{extract_score, score_record};
