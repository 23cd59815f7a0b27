//! Aquamark admin CLI — local administrative surface for the rendition
//! store: capacity reporting and the destructive clear-all operation.
//!
//! Configuration comes from the environment (see `EngineConfig`); both
//! commands operate directly on the local store with no network exposure.

use anyhow::Result;
use clap::{Parser, Subcommand};

use aquamark_core::EngineConfig;
use aquamark_storage::RenditionStore;

#[derive(Parser)]
#[command(name = "aquamark-admin", about = "Administer the aquamark rendition store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report total bytes used by stored renditions
    Size,
    /// Remove every stored rendition and recreate the empty store layout
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = EngineConfig::from_env()?;
    config.validate()?;

    let store = RenditionStore::open_at(&config.store_root, &config.all_labels()).await?;

    match cli.command {
        Commands::Size => {
            let bytes = store.total_size().await?;
            println!("{} bytes ({:.2} MiB)", bytes, bytes as f64 / 1_048_576.0);
        }
        Commands::Clear => {
            store.clear().await?;
            println!("Rendition store cleared");
        }
    }

    Ok(())
}
