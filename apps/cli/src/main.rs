//! SiteTriage CLI — bounded website crawl and accessibility triage.
//!
//! Scans a site from the terminal or serves the `/triage/scan` HTTP API.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
