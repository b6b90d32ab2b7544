//! Command-line front end for the Behat endpoint.
//!
//! Usage:
//!   behat create-node '{"title":"Example page","type":"page"}'
//!   behat list
//!
//! The site schema and users come from a TOML config; entities are kept in
//! a JSON state file so successive invocations operate on the same site.

pub mod config;

use anyhow::{bail, Context, Result};
use behat_endpoint::{Endpoint, Operation};
use behat_storage::FileSite;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

pub use config::{FieldConfig, SiteConfig};

/// Pseudo-operation that prints the supported operation names.
pub const LIST_OPERATIONS: &str = "list";

#[derive(Parser, Debug)]
#[command(name = "behat")]
#[command(about = "Behat endpoint: create and delete site content for test runs")]
pub struct Cli {
    /// Operation to run, e.g. create-node (or `list`)
    pub operation: String,

    /// Operation data in JSON format
    pub payload: Option<String>,

    /// Path to the site config file
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Path to the state file (overrides the config)
    #[arg(short, long)]
    pub state: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Runs one invocation, writing the result to `out`.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    if cli.operation == LIST_OPERATIONS {
        for op in Operation::ALL {
            writeln!(out, "{}", op.name())?;
        }
        return Ok(());
    }

    let Some(payload) = cli.payload.as_deref() else {
        bail!("operation '{}' requires a JSON payload", cli.operation);
    };

    let config = SiteConfig::load(&cli.config)?;
    let state_path = cli
        .state
        .clone()
        .unwrap_or_else(|| config.state_path(&cli.config));
    debug!("Using state file {:?}", state_path);

    let site = FileSite::open(config.build_site(), &state_path)
        .with_context(|| format!("Failed to open site state {}", state_path.display()))?;
    let endpoint = Endpoint::for_site(Arc::new(site));

    if let Some(result) = endpoint.execute(&cli.operation, payload)? {
        writeln!(out, "{}", serde_json::to_string(&result)?)?;
    }
    Ok(())
}
