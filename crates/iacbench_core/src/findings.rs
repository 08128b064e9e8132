//! Human-readable one-line findings derived from metric records.

use serde_json::Value;

use crate::category::Category;
use crate::record::MetricRecord;
use crate::report::Report;

/// Placeholder for a tool without a record in a category.
pub const NO_DATA: &str = "No data available";

/// Key findings for `tool` in `category`, e.g.
/// `"Monthly cost: $42.00, Optimization opportunities: 1"`.
pub fn key_findings(report: &Report, tool: &str, category: Category) -> String {
    match report.record(tool, category) {
        Some(record) => record_findings(record, category),
        None => NO_DATA.to_string(),
    }
}

/// Findings for a single record.
pub fn record_findings(record: &MetricRecord, category: Category) -> String {
    let findings = match category {
        Category::Complexity => vec![
            format!("Resource count: {}", display_value(record.lookup("resource_count"))),
            format!("Module count: {}", display_value(record.lookup("module_count"))),
        ],
        Category::Security => {
            if record.get("security_assessment").is_none() && record.get("summary").is_none() {
                Vec::new()
            } else {
                vec![
                    format!(
                        "Pass rate: {:.1}%",
                        record.number("security_assessment.pass_percentage").unwrap_or(0.0)
                    ),
                    format!(
                        "Failed checks: {}",
                        display_count(record.lookup("summary.failed_checks"))
                    ),
                ]
            }
        }
        Category::Deployment => {
            if record.get("overall").is_none() {
                Vec::new()
            } else {
                vec![
                    format!(
                        "Deployment time: {:.1}s",
                        record.number("overall.total_time_seconds").unwrap_or(0.0)
                    ),
                    format!(
                        "Peak CPU: {:.1}%",
                        record.number("overall.peak_cpu_percent").unwrap_or(0.0)
                    ),
                ]
            }
        }
        Category::Performance => {
            if record.get("summary").is_none() {
                Vec::new()
            } else {
                vec![
                    format!(
                        "Fastest op: {}",
                        record.text("summary.fastest_operation").unwrap_or("N/A")
                    ),
                    format!(
                        "Slowest op: {}",
                        record.text("summary.slowest_operation").unwrap_or("N/A")
                    ),
                ]
            }
        }
        Category::Cost => vec![
            format!("Monthly cost: ${:.2}", record.number("monthly_cost").unwrap_or(0.0)),
            format!(
                "Optimization opportunities: {}",
                record.array_len("cost_optimization_opportunities").unwrap_or(0)
            ),
        ],
    };

    if findings.is_empty() {
        NO_DATA.to_string()
    } else {
        findings.join(", ")
    }
}

/// Categories in which `tool` ranked first, e.g. `"Best in Security, Best in Cost"`.
pub fn tool_strengths(report: &Report, tool: &str) -> String {
    let strengths: Vec<String> = report
        .rankings
        .iter()
        .filter(|(_, ranking)| ranking.get(tool).is_some_and(|e| e.rank == 1))
        .map(|(category, _)| format!("Best in {}", category.label()))
        .collect();

    if strengths.is_empty() {
        "Balanced performance".to_string()
    } else {
        strengths.join(", ")
    }
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "N/A".to_string(),
        Some(other) => other.to_string(),
    }
}

fn display_count(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(n)) => n.to_string(),
        _ => "0".to_string(),
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
    fn test_complexity_findings() {
        let r = record(json!({"resource_count": 12, "module_count": 3}));
        assert_eq!(
            record_findings(&r, Category::Complexity),
            "Resource count: 12, Module count: 3"
        );

        let r = record(json!({}));
        assert_eq!(
            record_findings(&r, Category::Complexity),
            "Resource count: N/A, Module count: N/A"
        );
    }

    #[test]
    fn test_security_findings() {
        let r = record(json!({
            "summary": {"failed_checks": 4},
            "security_assessment": {"pass_percentage": 87.456}
        }));
        assert_eq!(
            record_findings(&r, Category::Security),
            "Pass rate: 87.5%, Failed checks: 4"
        );
        assert_eq!(record_findings(&record(json!({})), Category::Security), NO_DATA);
    }

    #[test]
    fn test_deployment_and_performance_findings() {
        let r = record(json!({"overall": {"total_time_seconds": 125, "peak_cpu_percent": 33.333}}));
        assert_eq!(
            record_findings(&r, Category::Deployment),
            "Deployment time: 125.0s, Peak CPU: 33.3%"
        );

        let r = record(json!({"summary": {"fastest_operation": "validate", "slowest_operation": null}}));
        assert_eq!(
            record_findings(&r, Category::Performance),
            "Fastest op: validate, Slowest op: N/A"
        );
    }

    #[test]
    fn test_cost_findings() {
        let r = record(json!({
            "monthly_cost": 42,
            "cost_optimization_opportunities": [{"estimated_savings": 10.0}]
        }));
        assert_eq!(
            record_findings(&r, Category::Cost),
            "Monthly cost: $42.00, Optimization opportunities: 1"
        );
    }
}
