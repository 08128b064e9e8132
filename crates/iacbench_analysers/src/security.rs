//! Security scan (Checkov) analysis.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use iacbench_core::round2;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::tool::IacTool;

/// Summary block of a Checkov JSON report.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CheckovSummary {
    #[serde(default)]
    pub passed: u64,
    #[serde(default)]
    pub failed: u64,
    #[serde(default)]
    pub skipped: u64,
    #[serde(default)]
    pub parsing_errors: u64,
    #[serde(default)]
    pub resource_count: u64,
    #[serde(default)]
    pub checkov_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecuritySummary {
    pub total_checks: u64,
    pub passed_checks: u64,
    pub failed_checks: u64,
    pub skipped_checks: u64,
    pub parsing_errors: u64,
    pub resource_count: u64,
    pub checkov_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityAssessment {
    pub pass_percentage: f64,
    pub security_score: f64,
    pub total_resources: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedResults {
    pub passed_checks: usize,
    pub failed_checks: usize,
}

/// Canonical security record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityReport {
    pub tool: IacTool,
    pub summary: SecuritySummary,
    pub security_assessment: SecurityAssessment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_results: Option<DetailedResults>,
}

/// Analyse a Checkov report file.
///
/// An unreadable report degrades to zero checks rather than failing.
pub fn analyse_security(tool: IacTool, check_file: &Path) -> SecurityReport {
    info!("Analysing security findings for {} from {:?}", tool, check_file);
    let document = load_checkov_document(check_file);
    let report = security_report(tool, &document);

    info!(
        "Security of {}: {} checks, {} passed, {} failed, {:.2}% pass rate",
        tool,
        report.summary.total_checks,
        report.summary.passed_checks,
        report.summary.failed_checks,
        report.security_assessment.pass_percentage
    );
    report
}

/// Build the security record from a parsed Checkov document.
pub fn security_report(tool: IacTool, document: &Value) -> SecurityReport {
    let summary: CheckovSummary = document
        .get("summary")
        .and_then(|s| serde_json::from_value(s.clone()).ok())
        .unwrap_or_default();

    let total_checks = summary.passed + summary.failed;
    let pass_percentage = pass_percentage(summary.passed, summary.failed);

    let detailed_results = document.get("results").map(|results| DetailedResults {
        passed_checks: array_len(results, "passed_checks"),
        failed_checks: array_len(results, "failed_checks"),
    });

    SecurityReport {
        tool,
        summary: SecuritySummary {
            total_checks,
            passed_checks: summary.passed,
            failed_checks: summary.failed,
            skipped_checks: summary.skipped,
            parsing_errors: summary.parsing_errors,
            resource_count: summary.resource_count,
            checkov_version: summary
                .checkov_version
                .unwrap_or_else(|| "Unknown".to_string()),
        },
        security_assessment: SecurityAssessment {
            pass_percentage,
            security_score: pass_percentage,
            total_resources: summary.resource_count,
        },
        detailed_results,
    }
}

/// Share of passed checks in percent, `0.0` when nothing was checked.
pub fn pass_percentage(passed: u64, failed: u64) -> f64 {
    let total = passed + failed;
    if total == 0 {
        return 0.0;
    }
    round2(100.0 * passed as f64 / total as f64)
}

/// Parse a Checkov report, tolerating trailing output after the document.
///
/// Returns an empty object if nothing usable can be recovered.
pub fn load_checkov_document(path: &Path) -> Value {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            error!("Error loading {:?}: {}", path, e);
            return Value::Object(Default::default());
        }
    };
    parse_checkov_content(&content).unwrap_or_else(|| {
        warn!("Empty or invalid content in {:?}", path);
        Value::Object(Default::default())
    })
}

fn parse_checkov_content(content: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(content) {
        return value.is_object().then_some(value);
    }
    // Checkov sometimes appends progress output after the JSON body
    let last_brace = content.rfind('}')?;
    serde_json::from_str::<Value>(&content[..=last_brace])
        .ok()
        .filter(Value::is_object)
}

fn array_len(value: &Value, key: &str) -> usize {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_pass_percentage() {
        assert_eq!(pass_percentage(0, 0), 0.0);
        assert_eq!(pass_percentage(3, 1), 75.0);
        assert_eq!(pass_percentage(2, 1), 66.67);
    }

    #[test]
    fn test_security_report_from_summary() {
        let doc = json!({
            "summary": {
                "passed": 45,
                "failed": 5,
                "skipped": 2,
                "parsing_errors": 0,
                "resource_count": 18,
                "checkov_version": "3.2.1"
            },
            "results": {
                "passed_checks": [{}, {}],
                "failed_checks": [{}]
            }
        });

        let report = security_report(IacTool::Terraform, &doc);
        assert_eq!(report.summary.total_checks, 50);
        assert_eq!(report.summary.checkov_version, "3.2.1");
        assert_eq!(report.security_assessment.security_score, 90.0);
        assert_eq!(report.security_assessment.total_resources, 18);
        assert_eq!(
            report.detailed_results,
            Some(DetailedResults { passed_checks: 2, failed_checks: 1 })
        );
    }

    #[test]
    fn test_security_report_empty_document() {
        let report = security_report(IacTool::OpenTofu, &json!({}));
        assert_eq!(report.summary.total_checks, 0);
        assert_eq!(report.summary.checkov_version, "Unknown");
        assert_eq!(report.security_assessment.pass_percentage, 0.0);
        assert!(report.detailed_results.is_none());
    }

    #[test]
    fn test_trailing_garbage_is_tolerated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("checks.json");
        fs::write(&path, "{\"summary\": {\"passed\": 9, \"failed\": 1}}\nScan complete.\n").unwrap();

        let report = analyse_security(IacTool::CloudFormation, &path);
        assert_eq!(report.security_assessment.pass_percentage, 90.0);
    }

    #[test]
    fn test_unreadable_report_degrades() {
        let dir = tempdir().unwrap();
        let report = analyse_security(IacTool::Terraform, &dir.path().join("absent.json"));
        assert_eq!(report.summary.total_checks, 0);

        let path = dir.path().join("list.json");
        fs::write(&path, "[1, 2]").unwrap();
        assert_eq!(load_checkov_document(&path), json!({}));
    }

    #[test]
    fn test_record_matches_score_path() {
        let report = security_report(IacTool::Terraform, &json!({"summary": {"passed": 1, "failed": 1}}));
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["security_assessment"]["security_score"], 50.0);
        assert_eq!(value["summary"]["failed_checks"], 1);
    }
}
