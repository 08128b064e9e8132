//! Deployment efficiency analysis.

use std::path::Path;

use iacbench_core::round2;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{AnalysisError, AnalysisResult};
use crate::input::{ideal_ratio_score, read_json, ResourceUsage, UsageStats};
use crate::tool::IacTool;

/// Raw inputs of one deployment measurement.
#[derive(Debug, Clone)]
pub struct DeploymentInputs<'a> {
    pub tool: IacTool,
    pub stack_name: &'a str,
    pub resource_usage: &'a Path,
    pub init_resource_usage: Option<&'a Path>,
    pub cloudtrail_events: &'a Path,
    pub start_time: i64,
    pub end_time: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentWindow {
    pub start: i64,
    pub end: i64,
    pub total_seconds: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseUsage {
    pub execution_time: f64,
    pub cpu: UsageStats,
    pub memory: UsageStats,
}

impl From<&ResourceUsage> for PhaseUsage {
    fn from(usage: &ResourceUsage) -> Self {
        Self {
            execution_time: usage.execution_time_seconds,
            cpu: usage.summary.cpu_percent,
            memory: usage.summary.memory_mb,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentUsage {
    pub deployment: PhaseUsage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init: Option<PhaseUsage>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApiCallSummary {
    pub service_breakdown: IndexMap<String, u64>,
    pub total_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentOverall {
    pub total_time_seconds: f64,
    pub deployment_time_seconds: f64,
    pub init_time_seconds: f64,
    pub peak_cpu_percent: f64,
    pub peak_memory_mb: f64,
    pub api_call_count: u64,
    pub efficiency_score: f64,
}

/// Canonical deployment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentReport {
    pub tool: IacTool,
    pub stack_name: String,
    pub deployment_time: DeploymentWindow,
    pub resource_usage: DeploymentUsage,
    pub api_calls: ApiCallSummary,
    pub overall: DeploymentOverall,
}

/// Analyse one deployment. The deployment usage and CloudTrail files are
/// required; the init usage file is optional.
pub fn analyse_deployment(inputs: &DeploymentInputs<'_>) -> AnalysisResult<DeploymentReport> {
    info!(
        "Analysing deployment of {} stack '{}'",
        inputs.tool, inputs.stack_name
    );

    if inputs.end_time < inputs.start_time {
        return Err(AnalysisError::InvalidInput {
            path: inputs.resource_usage.to_path_buf(),
            message: format!(
                "deployment ends ({}) before it starts ({})",
                inputs.end_time, inputs.start_time
            ),
        });
    }
    let total_seconds = inputs
        .end_time
        .checked_sub(inputs.start_time)
        .ok_or_else(|| AnalysisError::InvalidInput {
            path: inputs.resource_usage.to_path_buf(),
            message: format!(
                "deployment window {}..{} is out of range",
                inputs.start_time, inputs.end_time
            ),
        })?;

    let deployment: ResourceUsage = read_json(inputs.resource_usage)?;
    let init = match inputs.init_resource_usage {
        Some(path) if path.exists() => Some(read_json::<ResourceUsage>(path)?),
        _ => None,
    };
    let cloudtrail: Value = read_json(inputs.cloudtrail_events)?;

    let window = DeploymentWindow {
        start: inputs.start_time,
        end: inputs.end_time,
        total_seconds,
    };
    let resource_usage = DeploymentUsage {
        deployment: PhaseUsage::from(&deployment),
        init: init.as_ref().map(PhaseUsage::from),
    };
    let api_calls = summarize_api_calls(&cloudtrail);
    let overall = overall_metrics(&window, &resource_usage, &api_calls);

    info!(
        "Deployment of {}: {}s, {} API calls, efficiency {}",
        inputs.tool, window.total_seconds, api_calls.total_count, overall.efficiency_score
    );

    Ok(DeploymentReport {
        tool: inputs.tool,
        stack_name: inputs.stack_name.to_string(),
        deployment_time: window,
        resource_usage,
        api_calls,
        overall,
    })
}

/// Count CloudTrail events per AWS service.
///
/// Each `Events[].CloudTrailEvent` is itself a JSON string whose
/// `eventSource` (`ec2.amazonaws.com`) names the service. Events that
/// cannot be decoded are skipped.
pub fn summarize_api_calls(cloudtrail: &Value) -> ApiCallSummary {
    let mut service_breakdown: IndexMap<String, u64> = IndexMap::new();

    let events = cloudtrail
        .get("Events")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for event in events {
        let Some(raw) = event.get("CloudTrailEvent").and_then(Value::as_str) else {
            continue;
        };
        let decoded: Value = match serde_json::from_str(raw) {
            Ok(decoded) => decoded,
            Err(e) => {
                debug!("Skipping undecodable CloudTrail event: {}", e);
                continue;
            }
        };
        let source = decoded
            .get("eventSource")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if let Some(service) = source.split('.').next().filter(|s| !s.is_empty()) {
            *service_breakdown.entry(service.to_string()).or_insert(0) += 1;
        }
    }

    let total_count = service_breakdown.values().sum();
    ApiCallSummary {
        service_breakdown,
        total_count,
    }
}

/// Efficiency score in `0..=100` weighting time 40%, CPU, memory and API
/// calls 20% each, against ideals of 300s, 50% CPU, 1000MB and 100 calls.
pub fn efficiency_score(deployment_seconds: f64, cpu_peak: f64, memory_peak: f64, api_calls: u64) -> f64 {
    let time_score = ideal_ratio_score(300.0, deployment_seconds);
    let cpu_score = ideal_ratio_score(50.0, cpu_peak);
    let memory_score = ideal_ratio_score(1000.0, memory_peak);
    let api_score = ideal_ratio_score(100.0, api_calls as f64);

    round2(0.4 * time_score + 0.2 * cpu_score + 0.2 * memory_score + 0.2 * api_score)
}

fn overall_metrics(
    window: &DeploymentWindow,
    usage: &DeploymentUsage,
    api_calls: &ApiCallSummary,
) -> DeploymentOverall {
    let deployment_time = window.total_seconds as f64;
    let init_time = usage.init.map(|i| i.execution_time).unwrap_or(0.0);
    let cpu_peak = usage.deployment.cpu.max;
    let memory_peak = usage.deployment.memory.max;

    DeploymentOverall {
        total_time_seconds: deployment_time + init_time,
        deployment_time_seconds: deployment_time,
        init_time_seconds: init_time,
        peak_cpu_percent: cpu_peak,
        peak_memory_mb: memory_peak,
        api_call_count: api_calls.total_count,
        efficiency_score: efficiency_score(deployment_time, cpu_peak, memory_peak, api_calls.total_count),
    }
}
