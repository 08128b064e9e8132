//! Code complexity analysis of IaC sources.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use iacbench_core::round2;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::{AnalysisError, AnalysisResult};
use crate::input::read_json_optional;
use crate::tool::IacTool;

static RESOURCE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"resource\s+"([^"]+)"\s+"[^"]+""#).expect("resource block pattern is valid")
});

/// Canonical complexity record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityReport {
    pub tool: IacTool,
    pub resource_count: u64,
    pub module_count: u64,
    pub resource_types: IndexMap<String, u64>,
    pub resource_type_count: usize,
    pub basic_metrics: Map<String, Value>,
    pub tool_specific_metrics: Map<String, Value>,
    pub complexity_score: f64,
}

/// Analyse the IaC sources under `source_dir`.
///
/// `metrics_dir` may hold `{tool}_metrics.json` with `resource_count` and
/// `module_count`, plus `{tool}_graph_metrics.json` (HCL tools) or
/// `{tool}_structure_metrics.json` (CloudFormation) with a tool-specific
/// `complexity_score`. All of them are optional.
pub fn analyse_complexity(
    tool: IacTool,
    source_dir: &Path,
    metrics_dir: &Path,
) -> AnalysisResult<ComplexityReport> {
    info!("Analysing complexity of {} sources in {:?}", tool, source_dir);

    let basic_metrics: Map<String, Value> =
        read_json_optional(&metrics_dir.join(format!("{}_metrics.json", tool))).unwrap_or_default();

    let specific_name = if tool.is_hcl() {
        format!("{}_graph_metrics.json", tool)
    } else {
        format!("{}_structure_metrics.json", tool)
    };
    let tool_specific_metrics: Map<String, Value> =
        read_json_optional(&metrics_dir.join(specific_name)).unwrap_or_default();

    let resource_types = count_resource_types(tool, source_dir);
    let counted: u64 = resource_types.values().sum();

    let resource_count = basic_metrics
        .get("resource_count")
        .and_then(Value::as_u64)
        .unwrap_or(counted);
    let module_count = basic_metrics
        .get("module_count")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let tool_score = tool_specific_metrics
        .get("complexity_score")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);

    let complexity_score =
        complexity_score(resource_count, module_count, resource_types.len(), tool_score);

    info!(
        "Complexity of {}: {} resources, {} modules, {} resource types, score {}",
        tool,
        resource_count,
        module_count,
        resource_types.len(),
        complexity_score
    );

    Ok(ComplexityReport {
        tool,
        resource_count,
        module_count,
        resource_type_count: resource_types.len(),
        resource_types,
        basic_metrics,
        tool_specific_metrics,
        complexity_score,
    })
}

/// Complexity score; higher means more complex infrastructure.
///
/// Grows linearly with resource count and resource-type diversity. A few
/// modules lower it (reuse), many modules raise it. A positive tool-specific
/// score scales the result around 50.
pub fn complexity_score(
    resource_count: u64,
    module_count: u64,
    resource_type_count: usize,
    tool_score: f64,
) -> f64 {
    let base = 10.0 * (1.0 + resource_count as f64 / 20.0);

    let module_factor = match module_count {
        0 => 1.0,
        1..=4 => 0.9,
        _ => 1.1,
    };

    let diversity_factor = 1.0 + resource_type_count as f64 / 20.0;

    let tool_factor = if tool_score > 0.0 { tool_score / 50.0 } else { 1.0 };

    round2(base * module_factor * diversity_factor * tool_factor)
}

/// Count declared resources per type in the IaC sources of `tool`.
///
/// Hidden directories (`.terraform`, `.git`) are skipped. Entries are sorted
/// by resource type.
pub fn count_resource_types(tool: IacTool, source_dir: &Path) -> IndexMap<String, u64> {
    let mut counts: IndexMap<String, u64> = IndexMap::new();

    if !source_dir.exists() {
        warn!("Source directory does not exist: {:?}", source_dir);
        return counts;
    }

    for entry in WalkDir::new(source_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        if tool.is_hcl() && ext == "tf" {
            match fs::read(path) {
                Ok(bytes) => {
                    for resource_type in hcl_resource_types(&String::from_utf8_lossy(&bytes)) {
                        *counts.entry(resource_type).or_insert(0) += 1;
                    }
                }
                Err(e) => warn!("Failed to read {:?}: {}", path, e),
            }
        } else if !tool.is_hcl() && matches!(ext.as_str(), "yml" | "yaml" | "json") {
            match cloudformation_resource_types(path) {
                Ok(types) => {
                    for resource_type in types {
                        *counts.entry(resource_type).or_insert(0) += 1;
                    }
                }
                Err(e) => warn!("Skipping template: {}", e),
            }
        }
    }

    counts.sort_keys();
    debug!("Found {} resource types under {:?}", counts.len(), source_dir);
    counts
}

/// Resource types declared in an HCL document, in order of appearance.
pub fn hcl_resource_types(content: &str) -> Vec<String> {
    RESOURCE_BLOCK
        .captures_iter(content)
        .map(|c| c[1].to_string())
        .collect()
}

/// Resource types declared in a CloudFormation template (JSON or YAML).
///
/// Files that are not templates (no `Resources` mapping) yield nothing.
pub fn cloudformation_resource_types(path: &Path) -> AnalysisResult<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|source| AnalysisError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let template: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|e| AnalysisError::InvalidInput {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let Some(resources) = template.get("Resources").and_then(|r| r.as_mapping()) else {
        return Ok(Vec::new());
    };

    Ok(resources
        .values()
        .filter_map(|resource| resource.get("Type").and_then(|t| t.as_str()))
        .map(str::to_string)
        .collect())
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_complexity_score_baseline() {
        assert_eq!(complexity_score(0, 0, 0, 0.0), 10.0);
        // 10 * 2 * 1.5
        assert_eq!(complexity_score(20, 0, 10, 0.0), 30.0);
    }

    #[test]
    fn test_complexity_score_factors() {
        // few modules: 20 * 0.9
        assert_eq!(complexity_score(20, 3, 0, 0.0), 18.0);
        // many modules: 20 * 1.1
        assert_eq!(complexity_score(20, 5, 0, 0.0), 22.0);
        // tool score 75 => factor 1.5
        assert_eq!(complexity_score(20, 0, 0, 75.0), 30.0);
        assert_eq!(complexity_score(20, 0, 0, -5.0), 20.0);
    }

    #[test]
    fn test_hcl_resource_types() {
        let hcl = r#"
resource "aws_instance" "web" {
  ami = "ami-123"
}

resource  "aws_s3_bucket"   "logs" {}
data "aws_ami" "ubuntu" {}
resource "aws_instance" "worker" {}
"#;
        assert_eq!(
            hcl_resource_types(hcl),
            vec!["aws_instance", "aws_s3_bucket", "aws_instance"]
        );
    }

    #[test]
    fn test_count_terraform_sources() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("main.tf"),
            "resource \"aws_vpc\" \"main\" {}\nresource \"aws_subnet\" \"a\" {}\nresource \"aws_subnet\" \"b\" {}\n",
        )
        .unwrap();
        let hidden = dir.path().join(".terraform").join("modules");
        fs::create_dir_all(&hidden).unwrap();
        fs::write(hidden.join("vendored.tf"), "resource \"aws_iam_role\" \"r\" {}").unwrap();

        let counts = count_resource_types(IacTool::Terraform, dir.path());
        let entries: Vec<_> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(entries, vec![("aws_subnet", 2), ("aws_vpc", 1)]);
    }

    #[test]
    fn test_count_cloudformation_templates() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("stack.yaml"),
            r#"
AWSTemplateFormatVersion: "2010-09-09"
Resources:
  Bucket:
    Type: AWS::S3::Bucket
  Web:
    Type: AWS::EC2::Instance
    Properties:
      InstanceType: t2.micro
      ImageId: !Ref AmiId
"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("extra.json"),
            r#"{"Resources": {"Queue": {"Type": "AWS::SQS::Queue"}}}"#,
        )
        .unwrap();
        fs::write(dir.path().join("params.json"), r#"{"Parameters": []}"#).unwrap();
        fs::write(dir.path().join("broken.yml"), "Resources: [unclosed").unwrap();

        let counts = count_resource_types(IacTool::CloudFormation, dir.path());
        assert_eq!(counts.len(), 3);
        assert_eq!(counts["AWS::EC2::Instance"], 1);
        assert_eq!(counts["AWS::S3::Bucket"], 1);
        assert_eq!(counts["AWS::SQS::Queue"], 1);
    }

    #[test]
    fn test_cloudformation_template_errors() {
        let dir = tempdir().unwrap();
        let broken = dir.path().join("broken.yml");
        fs::write(&broken, "Resources: [unclosed").unwrap();

        assert!(matches!(
            cloudformation_resource_types(&broken),
            Err(AnalysisError::InvalidInput { path, .. }) if path == broken
        ));
        assert!(matches!(
            cloudformation_resource_types(&dir.path().join("missing.yml")),
            Err(AnalysisError::Read { .. })
        ));
    }

    #[test]
    fn test_analyse_with_metrics_files() {
        let src = tempdir().unwrap();
        fs::write(
            src.path().join("main.tf"),
            "resource \"aws_instance\" \"a\" {}\nresource \"aws_s3_bucket\" \"b\" {}\n",
        )
        .unwrap();

        let metrics = tempdir().unwrap();
        fs::write(
            metrics.path().join("opentofu_metrics.json"),
            r#"{"resource_count": 40, "module_count": 2}"#,
        )
        .unwrap();
        fs::write(
            metrics.path().join("opentofu_graph_metrics.json"),
            r#"{"complexity_score": 100}"#,
        )
        .unwrap();

        let report = analyse_complexity(IacTool::OpenTofu, src.path(), metrics.path()).unwrap();
        assert_eq!(report.resource_count, 40);
        assert_eq!(report.module_count, 2);
        assert_eq!(report.resource_type_count, 2);
        // 10 * 3 * 0.9 * 1.1 * 2
        assert_eq!(report.complexity_score, 59.4);
    }

    #[test]
    fn test_analyse_without_metrics_counts_sources() {
        let src = tempdir().unwrap();
        fs::write(src.path().join("a.tf"), "resource \"aws_vpc\" \"x\" {}").unwrap();
        let metrics = tempdir().unwrap();

        let report = analyse_complexity(IacTool::Terraform, src.path(), metrics.path()).unwrap();
        assert_eq!(report.resource_count, 1);
        assert_eq!(report.module_count, 0);
        assert!(report.basic_metrics.is_empty());
    }
}
