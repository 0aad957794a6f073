use anyhow::{Context, Result};
use clap::Parser;

use restock_cli::{Cli, RestockConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = RestockConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    restock_observability::init(config.log.format);

    tracing::debug!(command = ?cli.command, format = ?cli.format, "starting");
    restock_cli::run(cli, &config)
}
