//! Report command - Rank per-tool metric files and write the report.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use iacbench_core::{
    render_summary_text, write_reports, BenchConfig, Category, InputLayout, Report,
};

#[derive(Args)]
pub struct ReportArgs {
    /// Directory containing complexity results
    #[arg(long, required_unless_present = "results_dir")]
    pub complexity_dir: Option<PathBuf>,

    /// Directory containing security results
    #[arg(long, required_unless_present = "results_dir")]
    pub security_dir: Option<PathBuf>,

    /// Directory containing deployment results
    #[arg(long, required_unless_present = "results_dir")]
    pub deployment_dir: Option<PathBuf>,

    /// Directory containing performance results
    #[arg(long, required_unless_present = "results_dir")]
    pub performance_dir: Option<PathBuf>,

    /// Directory containing cost results
    #[arg(long, required_unless_present = "results_dir")]
    pub cost_dir: Option<PathBuf>,

    /// Root holding one sub-directory per category; explicit category
    /// directories take precedence
    #[arg(long)]
    pub results_dir: Option<PathBuf>,

    /// Directory to save the final report
    #[arg(short, long)]
    pub output_dir: PathBuf,

    /// YAML file overriding tools, weights and score keys
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Tools to compare, overriding the configured list
    #[arg(long, value_delimiter = ',')]
    pub tools: Vec<String>,
}

impl ReportArgs {
    fn layout(&self) -> InputLayout {
        let mut layout = self
            .results_dir
            .as_ref()
            .map(InputLayout::under_root)
            .unwrap_or_default();

        let explicit = [
            (Category::Complexity, &self.complexity_dir),
            (Category::Security, &self.security_dir),
            (Category::Deployment, &self.deployment_dir),
            (Category::Performance, &self.performance_dir),
            (Category::Cost, &self.cost_dir),
        ];
        for (category, dir) in explicit {
            if let Some(dir) = dir {
                layout = layout.with_dir(category, dir.clone());
            }
        }
        layout
    }

    fn config(&self) -> Result<BenchConfig> {
        let mut config = match &self.config {
            Some(path) => BenchConfig::from_yaml_file(path)
                .with_context(|| format!("Failed to load config {:?}", path))?,
            None => BenchConfig::default(),
        };
        if !self.tools.is_empty() {
            config = config.with_tools(self.tools.iter().cloned());
        }
        config.validate().context("Invalid comparison configuration")?;
        Ok(config)
    }
}

pub fn execute(args: ReportArgs, quiet: bool) -> Result<()> {
    let config = args.config()?;
    let layout = args.layout();

    info!("Generating comparison report for: {}", config.tools.join(", "));

    let report = Report::build(&config, &layout);
    let written = write_reports(&report, &args.output_dir)
        .with_context(|| format!("Failed to write report to {:?}", args.output_dir))?;

    if !quiet {
        print!("{}", render_summary_text(&report)?);
        println!();
        println!("Report: {}", written.json.display());
        println!("HTML:   {}", written.html.display());
    }

    Ok(())
}
