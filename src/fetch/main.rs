//! Dataset fetcher.
//!
//! Downloads the building dataset the locator reads, skipping the download
//! when the file is already present.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use redentor::config::Config;
use redentor::download::DatasetFetcher;

#[derive(Parser, Debug)]
#[command(name = "fetch")]
#[command(about = "Download the building dataset")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dataset URL (defaults to the Open Buildings Rio de Janeiro tile)
    #[arg(long)]
    url: Option<String>,

    /// Where to write the dataset
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Download even if the file already exists
    #[arg(long)]
    force: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let config = Config::load_or_default(args.config.as_deref())?;
    let url = args.url.unwrap_or(config.dataset.url);
    let output = args.output.unwrap_or(config.dataset.path);

    info!("Redentor dataset fetch");

    let fetcher = DatasetFetcher::new()?;
    if fetcher.fetch(&url, &output, args.force).await? {
        info!("Dataset ready at {}", output.display());
    }

    Ok(())
}
