//! Integration tests for building and emitting comparison reports.

use std::fs;
use std::path::Path;

use serde_json::json;
use tempfile::tempdir;

use iacbench_core::{
    write_reports, BenchConfig, Category, InputLayout, Report, DEFAULT_TOOLS,
};

fn write_record(root: &Path, category: Category, tool: &str, value: serde_json::Value) {
    let dir = root.join(category.as_str()).join(tool);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join(category.report_file_name(tool)),
        serde_json::to_string_pretty(&value).unwrap(),
    )
    .unwrap();
}

/// Fill every category for every default tool with a plausible record.
fn seed_full_results(root: &Path) {
    let complexity = [("terraform", 42.5), ("cloudformation", 55.0), ("opentofu", 38.0)];
    for (tool, score) in complexity {
        write_record(
            root,
            Category::Complexity,
            tool,
            json!({"tool": tool, "resource_count": 12, "module_count": 2, "complexity_score": score}),
        );
    }

    let security = [("terraform", 82.0), ("cloudformation", 75.5), ("opentofu", 82.0)];
    for (tool, score) in security {
        write_record(
            root,
            Category::Security,
            tool,
            json!({
                "tool": tool,
                "summary": {"failed_checks": 3},
                "security_assessment": {"pass_percentage": score, "security_score": score}
            }),
        );
    }

    let deployment = [("terraform", 70.0), ("cloudformation", 64.2), ("opentofu", 71.9)];
    for (tool, score) in deployment {
        write_record(
            root,
            Category::Deployment,
            tool,
            json!({"overall": {"total_time_seconds": 180, "peak_cpu_percent": 40.0, "efficiency_score": score}}),
        );
    }

    let performance = [("terraform", 90.0), ("cloudformation", 60.0), ("opentofu", 88.0)];
    for (tool, score) in performance {
        write_record(
            root,
            Category::Performance,
            tool,
            json!({"summary": {"performance_score": score, "fastest_operation": "init", "slowest_operation": "apply"}}),
        );
    }

    let cost = [("terraform", 85.0), ("cloudformation", 85.0), ("opentofu", 90.0)];
    for (tool, score) in cost {
        write_record(
            root,
            Category::Cost,
            tool,
            json!({"monthly_cost": 0.0, "cost_optimization_opportunities": [], "cost_efficiency_score": score}),
        );
    }
}

#[test]
fn test_full_report_rankings() {
    let temp = tempdir().unwrap();
    seed_full_results(temp.path());

    let report = Report::build(&BenchConfig::default(), &InputLayout::under_root(temp.path()));

    assert_eq!(report.tools_compared, DEFAULT_TOOLS.to_vec());
    assert_eq!(report.categories, Category::ALL.to_vec());

    let complexity: Vec<_> = report.rankings[&Category::Complexity]
        .iter()
        .map(|(t, e)| (t.as_str(), e.rank))
        .collect();
    assert_eq!(
        complexity,
        vec![("cloudformation", 1), ("terraform", 2), ("opentofu", 3)]
    );

    // terraform precedes opentofu in the tool list, so it wins the tie
    let security = &report.rankings[&Category::Security];
    assert_eq!(security["terraform"].rank, 1);
    assert_eq!(security["opentofu"].rank, 2);
    assert_eq!(security["cloudformation"].rank, 3);

    // Every ranking is a permutation of 1..=n over known tools
    for ranking in report.rankings.values() {
        let mut ranks: Vec<_> = ranking.values().map(|e| e.rank).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, (1..=ranking.len()).collect::<Vec<_>>());
        for tool in ranking.keys() {
            assert!(report.tools_compared.contains(tool));
        }
    }

    // opentofu: 0.15*80 + 0.25*90 + 0.25*100 + 0.2*90 + 0.15*100 = 92.5
    // terraform: 0.15*90 + 0.25*100 + 0.25*90 + 0.2*100 + 0.15*90 = 94.5
    // cloudformation: 0.15*100 + 0.25*80 + 0.25*80 + 0.2*80 + 0.15*80 = 83.0
    let overall: Vec<_> = report
        .overall_ranking
        .iter()
        .map(|(t, e)| (t.as_str(), e.rank, e.score))
        .collect();
    assert_eq!(
        overall,
        vec![
            ("terraform", 1, 94.5),
            ("opentofu", 2, 92.5),
            ("cloudformation", 3, 83.0)
        ]
    );
}

#[test]
fn test_missing_file_scores_zero_and_is_unranked() {
    let temp = tempdir().unwrap();
    seed_full_results(temp.path());
    fs::remove_file(
        temp.path()
            .join("cost")
            .join("opentofu")
            .join("cost_report.json"),
    )
    .unwrap();

    let report = Report::build(&BenchConfig::default(), &InputLayout::under_root(temp.path()));

    assert!(report.tools_compared.contains(&"opentofu".to_string()));
    assert!(!report.rankings[&Category::Cost].contains_key("opentofu"));
    assert_eq!(report.score("opentofu", Category::Cost), 0.0);
    assert!(report.record("opentofu", Category::Cost).is_none());
    assert_eq!(report.rankings[&Category::Cost].len(), 2);
    assert!(report.overall_ranking.contains_key("opentofu"));
}

#[test]
fn test_malformed_file_degrades() {
    let temp = tempdir().unwrap();
    seed_full_results(temp.path());
    fs::write(
        temp.path()
            .join("deployment")
            .join("terraform")
            .join("deployment_report.json"),
        "{ not json",
    )
    .unwrap();

    let report = Report::build(&BenchConfig::default(), &InputLayout::under_root(temp.path()));

    assert!(!report.rankings[&Category::Deployment].contains_key("terraform"));
    assert_eq!(report.rankings[&Category::Deployment]["opentofu"].rank, 1);
}

#[test]
fn test_empty_results_tree() {
    let temp = tempdir().unwrap();
    let report = Report::build(&BenchConfig::default(), &InputLayout::under_root(temp.path()));

    assert_eq!(report.tools_compared.len(), 3);
    assert!(report.rankings.values().all(|r| r.is_empty()));
    assert!(report.overall_ranking.is_empty());
}

#[test]
fn test_json_round_trip() {
    let temp = tempdir().unwrap();
    seed_full_results(temp.path());
    let report = Report::build(&BenchConfig::default(), &InputLayout::under_root(temp.path()));

    let out = temp.path().join("final");
    let written = write_reports(&report, &out).unwrap();
    assert!(written.html.exists());

    let content = fs::read_to_string(&written.json).unwrap();
    assert!(!content.contains("NaN"));
    assert!(!content.contains("Infinity"));

    let parsed: Report = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed, report);

    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    for key in [
        "generated_at",
        "tools_compared",
        "categories",
        "results",
        "rankings",
        "overall_ranking",
    ] {
        assert!(value.get(key).is_some(), "missing field {}", key);
    }
    assert_eq!(value["rankings"]["complexity"]["cloudformation"]["rank"], 1);
    assert_eq!(value["categories"][0], "complexity");
}

#[test]
fn test_output_write_failure_is_an_error() {
    let temp = tempdir().unwrap();
    let report = Report::build(&BenchConfig::default(), &InputLayout::under_root(temp.path()));

    let blocker = temp.path().join("occupied");
    fs::write(&blocker, "file, not directory").unwrap();

    let err = write_reports(&report, &blocker).unwrap_err();
    assert!(err.is_output_failure());
}
