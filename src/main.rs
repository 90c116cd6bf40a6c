//! Earnings ETL binary
//!
//! Runs one Extract → Transform → Load pass and exits.

use anyhow::Context;
use clap::Parser;
use earnings_etl::cli::{Cli, Runner};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Only --help / --version; everything else comes from the environment
    Cli::parse();
    let runner = Runner::new();

    if let Err(e) = runner.run().await.context("ETL run failed") {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}
