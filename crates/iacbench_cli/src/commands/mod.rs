//! CLI command definitions.
//!
//! `report` builds the ranked comparison from per-tool metric files;
//! `analyse` produces one of those metric files from raw collaborator output.

use clap::{Parser, Subcommand};

pub mod analyse;
pub mod report;

/// iacbench - Infrastructure-as-Code tool comparison
#[derive(Parser)]
#[command(name = "iacbench")]
#[command(version, about = "iacbench - Infrastructure-as-Code tool comparison")]
#[command(long_about = r#"
iacbench compares Infrastructure-as-Code tools (Terraform, CloudFormation,
OpenTofu) across complexity, security, deployment, performance and cost, and
ranks them per category and overall.

WORKFLOWS:
  analyse <category>  → Turn raw tool output into a per-tool metric file
  report              → Rank the metric files and write report.json/report.html

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Configuration error
  4 - Output write failure
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the comparison report from per-tool metric files
    Report(report::ReportArgs),

    /// Produce a per-tool metric file from raw measurements
    Analyse(analyse::AnalyseArgs),
}
