//! hostop: temporarily block hostnames via the hosts file.
//!
//! This is the main entry point for the hostop binary. It handles CLI argument
//! parsing, logging and telemetry initialization, configuration loading, and
//! hands the invocation to the orchestrator.
//!
//! # Process Architecture
//!
//! A blocking invocation writes its block and, unless `--foreground` is set,
//! relaunches this binary as `hostop --after=<delay> --reset=<id>` in a new
//! process group with null stdio, then exits. The relaunched process sleeps
//! and removes the block. Its diagnostics only reach syslog.

use anyhow::{Context, Result};
use clap::Parser;
use hostop::{cli::Cli, config::ConfigLoader, orchestrator, telemetry};
use tracing::debug;

fn main() -> Result<()> {
    // Malformed flags exit with 1 like every other failure; help and
    // version output keep clap's behavior
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    init_tracing(cli.verbose)?;

    debug!("Parsed CLI arguments: {:?}", cli);

    if let Err(e) = telemetry::init_logger() {
        debug!("Audit events will not be recorded: {}", e);
        telemetry::init_null_logger().context("Failed to initialize telemetry")?;
    }

    let config_loader = ConfigLoader::new();
    let config = config_loader
        .load(&cli)
        .context("Failed to load configuration")?;
    let settings = config.resolve(&cli).context("Invalid configuration")?;

    debug!("Resolved settings: {:?}", settings);

    orchestrator::run(cli.mode(), &settings)
}

/// Initialize the tracing subscriber for diagnostic logging on stderr.
///
/// # Verbosity Levels
/// - 0 (default): Only warnings and errors (or `RUST_LOG`)
/// - 1 (-v): Info level
/// - 2 (-vv): Debug level
/// - 3+ (-vvv): Trace level
fn init_tracing(verbose: u8) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}
