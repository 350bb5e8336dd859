//! trafficctl CLI Binary
//!
//! Command-line front end for the cluster traffic manager.

use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::process;
use tracing::{error, info};
use trafficctl::cli::{map_error, Cli, RunContext};
use trafficctl::config::ConfigLoader;
use trafficctl::error::CliError;
use trafficctl::logging::{init_logging, LoggingConfig};

fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load(cli.config.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    // Initialize logging early
    let logging_config = build_logging_config(&cli, &config.logging);
    if let Err(e) = setup_logging(&logging_config) {
        eprintln!("{:#}", e);
        process::exit(1);
    }

    info!("trafficctl starting");
    let context = RunContext::with_config(config);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = run(&context, &cli, &mut out) {
        error!("Command failed: {}", e);
        eprintln!("{}", map_error(&e));
        process::exit(1);
    }
}

/// Execute the command and flush its output; a failed flush fails the command.
fn run(context: &RunContext, cli: &Cli, out: &mut dyn Write) -> Result<(), CliError> {
    context.execute(cli, out)?;
    out.flush()?;
    Ok(())
}

fn setup_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    init_logging(Some(config)).context("Failed to initialize logging")
}

/// Build logging configuration from CLI args and the loaded config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli, base: &LoggingConfig) -> LoggingConfig {
    let mut config = base.clone();
    let args = &cli.logging;

    if args.quiet {
        config.enabled = false;
    }
    if args.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = args.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = args.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = args.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = args.log_file {
        config.file = Some(file.clone());
        // A log file alone implies file output unless an output was named.
        if args.log_output.is_none() {
            config.output = "file".to_string();
        }
    }

    config
}
