use brc_aggregator::cli::{run, Cli};
use brc_aggregator::error::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
