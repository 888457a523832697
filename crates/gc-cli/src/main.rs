//! gcontacts: command line front end for the contacts gateway
//!
//! Usage:
//!   gcontacts list --max-results 10
//!   gcontacts get jane@example.com
//!   gcontacts call contacts_search '{"query": "jane"}'
//!   gcontacts --help

mod cli;

use clap::Parser;
use gc_core::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = cli::Cli::parse();

    // Logs go to stderr; stdout carries only results
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(args.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::debug!("People API: {}", config.people.base_url);

    let ok = cli::run(args.command, &config).await?;
    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
