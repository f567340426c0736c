//! ---
//! wbc_section: "05-operator-interfaces"
//! wbc_subsection: "binary"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Operator CLI for composing and publishing controller commands."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use r_wbc_common::{init_tracing, AppConfig};

mod command;
mod snapshot;

const DEFAULT_CONFIG_CANDIDATES: [&str; 2] = ["r-wbc.toml", "configs/valkyrie.example.toml"];

#[derive(Debug, Parser)]
#[command(
    author,
    disable_version_flag = true,
    arg_required_else_help = true,
    about = "R-WBC whole-body command utility",
    long_about = None
)]
struct Cli {
    #[arg(
        short = 'V',
        long = "version",
        action = ArgAction::SetTrue,
        help = "Print version information and exit"
    )]
    version: bool,

    /// Configuration file (defaults to ./r-wbc.toml, then the bundled example).
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        env = "R_WBC_CONFIG",
        global = true
    )]
    config: Option<PathBuf>,

    /// JSON snapshot of frame poses and joint positions used as robot state.
    #[arg(long = "state", value_name = "FILE", global = true)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<command::Commands>,
}

fn load_config(explicit: Option<&PathBuf>) -> Result<AppConfig> {
    let loaded = match explicit {
        Some(path) => AppConfig::load_with_source(&[path])?,
        None => AppConfig::load_with_source(&DEFAULT_CONFIG_CANDIDATES)?,
    };
    tracing::debug!(source = %loaded.source.display(), "configuration loaded");
    Ok(loaded.config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.version {
        println!("r-wbcctl {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    let Some(command) = cli.command else {
        return Ok(());
    };

    let config = load_config(cli.config.as_ref())?;
    init_tracing("r-wbcctl", &config.logging).context("failed to initialise logging")?;
    let snapshot = match &cli.state {
        Some(path) => snapshot::StateSnapshot::load(path)?,
        None => snapshot::StateSnapshot::default(),
    };
    command::run(command, &config, snapshot)
}
