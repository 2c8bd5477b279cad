use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, debug};
use openf1_client::cli::{self, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if cli.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    debug!("Starting openf1 for endpoint {}", cli.endpoint);

    let output = cli::run(&cli).await?;
    println!("{}", output);

    Ok(())
}
