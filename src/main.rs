// src/main.rs
use anyhow::Result;
use candle_pattern_engine::cli::{self, Cli};
use clap::Parser;

fn main() -> Result<()> {
    // Initialize environment
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Parse command line arguments and execute
    let cli = Cli::parse();
    cli::execute(cli)
}
