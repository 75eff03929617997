use anyhow::Context;
use clap::Parser;
use fire_pollution::cli::{run, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli).await.context("fire-pollution run failed")
}
