//! Performance report over per-operation resource samples.

use std::path::Path;

use iacbench_core::round2;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::AnalysisResult;
use crate::input::{ideal_ratio_score, read_json, ResourceUsage};
use crate::tool::IacTool;

const PERFORMANCE_SUFFIX: &str = "_performance.json";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperationMetrics {
    pub execution_time: f64,
    pub cpu_peak: f64,
    pub memory_peak: f64,
}

impl From<&ResourceUsage> for OperationMetrics {
    fn from(usage: &ResourceUsage) -> Self {
        Self {
            execution_time: usage.execution_time_seconds,
            cpu_peak: usage.summary.cpu_percent.max,
            memory_peak: usage.summary.memory_mb.max,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub total_operations: usize,
    pub fastest_operation: Option<String>,
    pub slowest_operation: Option<String>,
    pub highest_cpu_operation: Option<String>,
    pub highest_memory_operation: Option<String>,
    pub performance_score: f64,
}

/// Canonical performance record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub tool: IacTool,
    pub operations: IndexMap<String, OperationMetrics>,
    pub summary: PerformanceSummary,
}

/// Build a performance report from every `<operation>_performance.json`
/// sample in `data_dir`, in file name order.
pub fn analyse_performance(tool: IacTool, data_dir: &Path) -> AnalysisResult<PerformanceReport> {
    info!("Analysing performance samples of {} in {:?}", tool, data_dir);

    let pattern = format!(
        "{}/*{}",
        glob::Pattern::escape(&data_dir.to_string_lossy()),
        PERFORMANCE_SUFFIX
    );
    let mut files: Vec<_> = glob::glob(&pattern)?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Skipping unreadable sample: {}", e);
                None
            }
        })
        .collect();
    files.sort();

    let mut operations = IndexMap::new();
    for path in files {
        let Some(name) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(PERFORMANCE_SUFFIX))
            .map(str::to_string)
        else {
            continue;
        };
        let usage: ResourceUsage = read_json(&path)?;
        operations.insert(name, OperationMetrics::from(&usage));
    }

    let report = performance_report(tool, operations);
    info!(
        "Performance of {}: {} operations, score {}",
        tool, report.summary.total_operations, report.summary.performance_score
    );
    Ok(report)
}

/// Summarize per-operation metrics. On ties the earlier operation wins.
pub fn performance_report(
    tool: IacTool,
    operations: IndexMap<String, OperationMetrics>,
) -> PerformanceReport {
    let mut summary = PerformanceSummary {
        total_operations: operations.len(),
        ..Default::default()
    };

    let mut fastest = f64::INFINITY;
    let mut slowest = 0.0;
    let mut highest_cpu = 0.0;
    let mut highest_memory = 0.0;

    for (name, metrics) in &operations {
        if metrics.execution_time < fastest {
            fastest = metrics.execution_time;
            summary.fastest_operation = Some(name.clone());
        }
        if metrics.execution_time > slowest {
            slowest = metrics.execution_time;
            summary.slowest_operation = Some(name.clone());
        }
        if metrics.cpu_peak > highest_cpu {
            highest_cpu = metrics.cpu_peak;
            summary.highest_cpu_operation = Some(name.clone());
        }
        if metrics.memory_peak > highest_memory {
            highest_memory = metrics.memory_peak;
            summary.highest_memory_operation = Some(name.clone());
        }
    }

    summary.performance_score = performance_score(operations.values());

    PerformanceReport {
        tool,
        operations,
        summary,
    }
}

/// Score in `0..=100` from average time, CPU and memory, weighted 50/25/25
/// against ideals of 10s, 30% CPU and 500MB. No operations scores 0.
pub fn performance_score<'a>(operations: impl IntoIterator<Item = &'a OperationMetrics>) -> f64 {
    let (mut count, mut time, mut cpu, mut memory) = (0usize, 0.0, 0.0, 0.0);
    for op in operations {
        count += 1;
        time += op.execution_time;
        cpu += op.cpu_peak;
        memory += op.memory_peak;
    }
    if count == 0 {
        return 0.0;
    }
    let n = count as f64;

    let time_score = ideal_ratio_score(10.0, time / n);
    let cpu_score = ideal_ratio_score(30.0, cpu / n);
    let memory_score = ideal_ratio_score(500.0, memory / n);

    round2(0.5 * time_score + 0.25 * cpu_score + 0.25 * memory_score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn metrics(time: f64, cpu: f64, memory: f64) -> OperationMetrics {
        OperationMetrics {
            execution_time: time,
            cpu_peak: cpu,
            memory_peak: memory,
        }
    }

    #[test]
    fn test_performance_score() {
        assert_eq!(performance_score(&Vec::<OperationMetrics>::new()), 0.0);
        assert_eq!(performance_score(&[metrics(5.0, 10.0, 200.0)]), 100.0);
        // averages 20s / 60% / 1000MB: every component at 50
        assert_eq!(
            performance_score(&[metrics(10.0, 30.0, 500.0), metrics(30.0, 90.0, 1500.0)]),
            50.0
        );
    }

    #[test]
    fn test_summary_extremes() {
        let mut ops = IndexMap::new();
        ops.insert("apply".to_string(), metrics(40.0, 55.0, 300.0));
        ops.insert("init".to_string(), metrics(4.0, 10.0, 120.0));
        ops.insert("plan".to_string(), metrics(12.0, 55.0, 310.0));

        let report = performance_report(IacTool::Terraform, ops);
        let summary = &report.summary;
        assert_eq!(summary.total_operations, 3);
        assert_eq!(summary.fastest_operation.as_deref(), Some("init"));
        assert_eq!(summary.slowest_operation.as_deref(), Some("apply"));
        assert_eq!(summary.highest_cpu_operation.as_deref(), Some("apply"));
        assert_eq!(summary.highest_memory_operation.as_deref(), Some("plan"));
    }

    #[test]
    fn test_analyse_directory() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("plan_performance.json"),
            json!({"execution_time_seconds": 8.0, "summary": {"cpu_percent": {"max": 20.0}, "memory_mb": {"max": 250.0}}}).to_string(),
        )
        .unwrap();
        fs::write(
            dir.path().join("apply_performance.json"),
            json!({"execution_time_seconds": 12.0, "summary": {"cpu_percent": {"max": 40.0}, "memory_mb": {"max": 750.0}}}).to_string(),
        )
        .unwrap();
        fs::write(dir.path().join("notes.json"), "{}").unwrap();

        let report = analyse_performance(IacTool::OpenTofu, dir.path()).unwrap();
        let names: Vec<_> = report.operations.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["apply", "plan"]);
        assert_eq!(report.summary.fastest_operation.as_deref(), Some("plan"));
        assert!(report.summary.performance_score > 0.0);
    }

    #[test]
    fn test_empty_directory_scores_zero() {
        let dir = tempdir().unwrap();
        let report = analyse_performance(IacTool::CloudFormation, dir.path()).unwrap();
        assert_eq!(report.summary.total_operations, 0);
        assert_eq!(report.summary.performance_score, 0.0);
        assert!(report.summary.fastest_operation.is_none());
    }

    #[test]
    fn test_directory_name_with_glob_characters() {
        let root = tempdir().unwrap();
        let dir = root.path().join("run[1]*?");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("plan_performance.json"),
            json!({"execution_time_seconds": 5.0, "summary": {"cpu_percent": {"max": 10.0}, "memory_mb": {"max": 200.0}}}).to_string(),
        )
        .unwrap();

        let report = analyse_performance(IacTool::Terraform, &dir).unwrap();
        assert_eq!(report.summary.total_operations, 1);
        assert_eq!(report.summary.performance_score, 100.0);
    }
}
