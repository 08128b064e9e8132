//! iacbench CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Configuration error
//! - 4: Output write failure

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use iacbench_analysers::AnalysisError;
use iacbench_core::BenchError;

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const CONFIG_ERROR: u8 = 3;
    pub const OUTPUT_ERROR: u8 = 4;
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Report(args) => commands::report::execute(args, cli.quiet),
        Commands::Analyse(args) => commands::analyse::execute(args),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "iacbench=warn"
    } else if verbose {
        "iacbench=debug"
    } else {
        "iacbench=info"
    };

    let mut filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    if let Ok(directive) = level.parse() {
        filter = filter.add_directive(directive);
    }

    // Logging already initialized is not an error
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

/// Map an error chain to its exit code.
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(err) = cause.downcast_ref::<BenchError>() {
            return bench_exit_code(err);
        }
        if let Some(err) = cause.downcast_ref::<AnalysisError>() {
            return match err {
                AnalysisError::Output(inner) => bench_exit_code(inner),
                AnalysisError::UnsupportedTool(_) => ExitCodes::INVALID_ARGS,
                _ => ExitCodes::GENERAL_ERROR,
            };
        }
    }
    ExitCodes::GENERAL_ERROR
}

fn bench_exit_code(err: &BenchError) -> u8 {
    match err {
        e if e.is_output_failure() => ExitCodes::OUTPUT_ERROR,
        BenchError::InvalidConfig(_) | BenchError::ConfigRead { .. } | BenchError::Yaml(_) => {
            ExitCodes::CONFIG_ERROR
        }
        _ => ExitCodes::GENERAL_ERROR,
    }
}
