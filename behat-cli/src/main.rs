//! `behat` binary.
//!
//! Runs a single endpoint operation and prints its JSON result on stdout.
//! Logs go to stderr so stdout stays machine-readable.

use anyhow::Result;
use behat_cli::{run, Cli};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let stdout = std::io::stdout();
    run(&cli, &mut stdout.lock())
}
