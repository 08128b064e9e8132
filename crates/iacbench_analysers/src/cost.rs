//! Cost normalization across Infracost and CloudFormation estimates.

use std::path::Path;

use iacbench_core::round2;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::AnalysisResult;
use crate::input::read_json;
use crate::pricing::CostAnalysis;
use crate::tool::IacTool;

pub const INFRACOST_FILE: &str = "infracost.json";
pub const CLOUDFORMATION_COST_FILE: &str = "cost_analysis.json";

const OPPORTUNITY_THRESHOLD: f64 = 50.0;
const INSTANCE_SUGGESTION: &str = "Consider using a smaller instance type or Spot Instances";
const DATABASE_SUGGESTION: &str =
    "Consider using multi-AZ only in production or using Aurora Serverless";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostOpportunity {
    pub resource_type: String,
    pub monthly_cost: f64,
    pub suggestion: String,
    pub estimated_savings: f64,
}

/// Canonical cost record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostReport {
    pub tool: IacTool,
    pub monthly_cost: f64,
    pub resource_breakdown: IndexMap<String, f64>,
    pub cost_optimization_opportunities: Vec<CostOpportunity>,
    pub cost_efficiency_score: f64,
}

/// Normalize the cost data found in `cost_data_dir`.
///
/// HCL tools read `infracost.json`, CloudFormation reads
/// `cost_analysis.json`. A missing file yields a zero-cost report.
pub fn analyse_cost(tool: IacTool, cost_data_dir: &Path) -> AnalysisResult<CostReport> {
    info!("Analysing cost data of {} in {:?}", tool, cost_data_dir);

    let file_name = if tool.is_hcl() {
        INFRACOST_FILE
    } else {
        CLOUDFORMATION_COST_FILE
    };
    let path = cost_data_dir.join(file_name);

    let report = if !path.exists() {
        warn!("No cost data for {} at {:?}", tool, path);
        cost_report(tool, 0.0, IndexMap::new(), Vec::new())
    } else if tool.is_hcl() {
        let infracost: Value = read_json(&path)?;
        infracost_report(tool, &infracost)
    } else {
        let analysis: CostAnalysis = read_json(&path)?;
        cloudformation_report(tool, &analysis)
    };

    info!(
        "Cost of {}: ${:.2}/month, efficiency {}",
        tool, report.monthly_cost, report.cost_efficiency_score
    );
    Ok(report)
}

/// Build a cost record from an Infracost breakdown.
///
/// Costs are grouped by the provider prefix of the resource type.
pub fn infracost_report(tool: IacTool, infracost: &Value) -> CostReport {
    let monthly_cost = infracost
        .get("totalMonthlyCost")
        .map(cost_value)
        .unwrap_or(0.0);

    let resources = infracost
        .pointer("/projects/0/breakdown/resources")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut breakdown: IndexMap<String, f64> = IndexMap::new();
    let mut opportunities = Vec::new();
    for resource in resources {
        let resource_type = resource
            .get("resourceType")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let monthly = resource.get("monthlyCost").map(cost_value).unwrap_or(0.0);

        let service = resource_type.split('_').next().unwrap_or_default();
        *breakdown.entry(service.to_string()).or_insert(0.0) += monthly;

        if let Some(opportunity) = infracost_opportunity(resource_type, monthly) {
            opportunities.push(opportunity);
        }
    }

    cost_report(tool, monthly_cost, breakdown, opportunities)
}

/// Build a cost record from a CloudFormation cost estimate.
pub fn cloudformation_report(tool: IacTool, analysis: &CostAnalysis) -> CostReport {
    let opportunities = analysis
        .resources
        .values()
        .filter(|r| r.resource_type.contains("EC2::Instance") && r.monthly_cost > OPPORTUNITY_THRESHOLD)
        .map(|r| opportunity(&r.resource_type, r.monthly_cost, INSTANCE_SUGGESTION, 0.7))
        .collect();

    cost_report(
        tool,
        analysis.monthly_cost_estimate,
        analysis.resource_breakdown.clone(),
        opportunities,
    )
}

/// Cost efficiency in `0..=100`; cheap stacks with little savings
/// potential score highest.
pub fn cost_efficiency_score(monthly_cost: f64, opportunities: &[CostOpportunity]) -> f64 {
    let mut score: f64 = 80.0;

    if monthly_cost < 50.0 {
        score += 15.0;
    } else if monthly_cost < 100.0 {
        score += 10.0;
    } else if monthly_cost < 200.0 {
        score += 5.0;
    } else if monthly_cost > 500.0 {
        score -= 10.0;
    }

    let savings: f64 = opportunities.iter().map(|o| o.estimated_savings).sum();
    let ratio = if monthly_cost > 0.0 {
        savings / monthly_cost
    } else {
        0.0
    };

    if ratio > 0.5 {
        score -= 15.0;
    } else if ratio > 0.3 {
        score -= 10.0;
    } else if ratio > 0.1 {
        score -= 5.0;
    }

    round2(score).clamp(0.0, 100.0)
}

fn cost_report(
    tool: IacTool,
    monthly_cost: f64,
    resource_breakdown: IndexMap<String, f64>,
    opportunities: Vec<CostOpportunity>,
) -> CostReport {
    CostReport {
        tool,
        monthly_cost,
        resource_breakdown,
        cost_efficiency_score: cost_efficiency_score(monthly_cost, &opportunities),
        cost_optimization_opportunities: opportunities,
    }
}

fn infracost_opportunity(resource_type: &str, monthly_cost: f64) -> Option<CostOpportunity> {
    if monthly_cost <= OPPORTUNITY_THRESHOLD {
        return None;
    }
    if resource_type.contains("aws_instance") {
        Some(opportunity(resource_type, monthly_cost, INSTANCE_SUGGESTION, 0.7))
    } else if resource_type.contains("aws_db_instance") {
        Some(opportunity(resource_type, monthly_cost, DATABASE_SUGGESTION, 0.4))
    } else {
        None
    }
}

fn opportunity(resource_type: &str, monthly_cost: f64, suggestion: &str, share: f64) -> CostOpportunity {
    CostOpportunity {
        resource_type: resource_type.to_string(),
        monthly_cost,
        suggestion: suggestion.to_string(),
        estimated_savings: monthly_cost * share,
    }
}

/// Infracost encodes amounts as decimal strings; plain numbers and nulls
/// are accepted too. Anything not finite counts as 0.
fn cost_value(value: &Value) -> f64 {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    amount.filter(|v| v.is_finite()).unwrap_or(0.0)
}
