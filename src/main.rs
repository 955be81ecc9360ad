//! quixcc entry point

use clap::Parser;
use tracing_subscriber::EnvFilter;

use quixcc::cli::{self, Cli};

fn main() {
    let cli = Cli::parse();

    // Structured logging to stderr; stdout carries command output.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    cli::run(cli);
}
