//! # stackcheck CLI entry point
//!
//! Parses command-line arguments, installs logging, loads the optional
//! config file, and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stackcheck_cli::catalog::{run_describe, run_types, DescribeArgs, TypesArgs};
use stackcheck_cli::config::CliConfig;
use stackcheck_cli::validate::{run_validate, ValidateArgs};

/// Validate infrastructure templates against a schema catalog.
#[derive(Parser, Debug)]
#[command(name = "stackcheck", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file (default: ./stackcheck.yaml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate templates or typed documents against the schema catalog.
    Validate(ValidateArgs),

    /// List every type identifier in the schema catalog.
    Types(TypesArgs),

    /// Show the field table and rules of one type.
    Describe(DescribeArgs),
}

/// Exit code when the command itself could not run.
const OPERATIONAL_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "stackcheck starting");

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = match CliConfig::discover(cli.config.as_deref(), &cwd) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(OPERATIONAL_ERROR);
        }
    };

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args, &config),
        Commands::Types(args) => run_types(&args, &config),
        Commands::Describe(args) => run_describe(&args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(OPERATIONAL_ERROR)
        }
    }
}
