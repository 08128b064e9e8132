//! Analyse command - Produce per-tool metric files from raw measurements.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tracing::info;

use iacbench_analysers::{
    analyse_complexity, analyse_cost, analyse_deployment, analyse_performance, analyse_security,
    write_record, CloudFormationCostEstimator, DeploymentInputs, IacTool, StaticPriceTable,
};

#[derive(Args)]
pub struct AnalyseArgs {
    #[command(subcommand)]
    pub target: AnalyseTarget,
}

#[derive(Subcommand)]
pub enum AnalyseTarget {
    /// Count resources and modules in IaC sources
    Complexity(ComplexityArgs),

    /// Summarize a Checkov scan
    Security(SecurityArgs),

    /// Measure one deployment
    Deployment(DeploymentArgs),

    /// Summarize per-operation performance samples
    Performance(PerformanceArgs),

    /// Normalize Infracost or CloudFormation cost data
    Cost(CostArgs),

    /// Estimate the monthly cost of a CloudFormation template
    #[command(name = "cfn-cost")]
    CfnCost(CfnCostArgs),
}

#[derive(Args)]
pub struct ComplexityArgs {
    /// IaC tool (terraform, cloudformation, opentofu)
    #[arg(short, long)]
    pub tool: IacTool,

    /// Directory containing IaC code
    #[arg(short, long)]
    pub input_dir: PathBuf,

    /// Directory containing pre-computed metrics (defaults to the input directory)
    #[arg(long)]
    pub metrics_dir: Option<PathBuf>,

    /// Output JSON file for the complexity report
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct SecurityArgs {
    /// IaC tool (terraform, cloudformation, opentofu)
    #[arg(short, long)]
    pub tool: IacTool,

    /// Path to Checkov checks JSON
    #[arg(long)]
    pub check_file: PathBuf,

    /// Output JSON file for the security report
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct DeploymentArgs {
    /// IaC tool (terraform, cloudformation, opentofu)
    #[arg(short, long)]
    pub tool: IacTool,

    /// Stack/deployment name
    #[arg(long)]
    pub stack_name: String,

    /// Path to resource usage JSON
    #[arg(long)]
    pub resource_usage: PathBuf,

    /// Path to init resource usage JSON (if applicable)
    #[arg(long)]
    pub init_resource_usage: Option<PathBuf>,

    /// Path to CloudTrail events JSON
    #[arg(long)]
    pub cloudtrail_events: PathBuf,

    /// Deployment start time (epoch seconds)
    #[arg(long)]
    pub start_time: i64,

    /// Deployment end time (epoch seconds)
    #[arg(long)]
    pub end_time: i64,

    /// Output JSON file for the deployment report
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct PerformanceArgs {
    /// IaC tool (terraform, cloudformation, opentofu)
    #[arg(short, long)]
    pub tool: IacTool,

    /// Directory containing performance test results
    #[arg(long)]
    pub data_dir: PathBuf,

    /// Output JSON file for the performance report
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct CostArgs {
    /// IaC tool (terraform, cloudformation, opentofu)
    #[arg(short, long)]
    pub tool: IacTool,

    /// Directory containing cost data
    #[arg(long)]
    pub cost_data: PathBuf,

    /// Output JSON file for the cost report
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct CfnCostArgs {
    /// Path to CloudFormation template
    #[arg(long)]
    pub template: PathBuf,

    /// Output JSON file for the cost analysis
    #[arg(short, long)]
    pub output: PathBuf,
}

pub fn execute(args: AnalyseArgs) -> Result<()> {
    match args.target {
        AnalyseTarget::Complexity(args) => {
            let metrics_dir = args.metrics_dir.as_ref().unwrap_or(&args.input_dir);
            let report = analyse_complexity(args.tool, &args.input_dir, metrics_dir)
                .with_context(|| format!("Complexity analysis of {:?} failed", args.input_dir))?;
            write_record(&args.output, &report)?;
        }
        AnalyseTarget::Security(args) => {
            let report = analyse_security(args.tool, &args.check_file);
            write_record(&args.output, &report)?;
        }
        AnalyseTarget::Deployment(args) => {
            let report = analyse_deployment(&DeploymentInputs {
                tool: args.tool,
                stack_name: &args.stack_name,
                resource_usage: &args.resource_usage,
                init_resource_usage: args.init_resource_usage.as_deref(),
                cloudtrail_events: &args.cloudtrail_events,
                start_time: args.start_time,
                end_time: args.end_time,
            })
            .with_context(|| format!("Deployment analysis of '{}' failed", args.stack_name))?;
            write_record(&args.output, &report)?;
        }
        AnalyseTarget::Performance(args) => {
            let report = analyse_performance(args.tool, &args.data_dir)
                .with_context(|| format!("Performance analysis of {:?} failed", args.data_dir))?;
            write_record(&args.output, &report)?;
        }
        AnalyseTarget::Cost(args) => {
            let report = analyse_cost(args.tool, &args.cost_data)
                .with_context(|| format!("Cost analysis of {:?} failed", args.cost_data))?;
            write_record(&args.output, &report)?;
        }
        AnalyseTarget::CfnCost(args) => {
            let mut estimator = CloudFormationCostEstimator::new(StaticPriceTable::new());
            let analysis = estimator
                .estimate_file(&args.template)
                .with_context(|| format!("Cost estimate of {:?} failed", args.template))?;
            write_record(&args.output, &analysis)?;
            info!(
                "{} prices looked up for {} resources",
                estimator.cache().source_lookups(),
                analysis.resources.len()
            );
        }
    }

    Ok(())
}
