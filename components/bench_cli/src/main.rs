//! jsbench CLI
//!
//! Entry point for the benchmark harness. Parses CLI arguments,
//! initializes logging, and delegates to the app module.

use bench_cli::{app, Cli};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();

    // No resolvable selection: show usage and signal failure.
    if !cli.all && !cli.config_only && cli.suites.is_empty() {
        let _ = Cli::command().print_help();
        std::process::exit(1);
    }

    if let Err(e) = app::run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
