//! catalog-gateway - batch user operations over HTTP

use anyhow::{Context, Result};
use catalog_gateway::{Config, server::HttpServer, utils::logging::init_tracing};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "gateway")]
#[command(version, about = "Batch user operations gateway", long_about = None)]
struct Args {
    /// Configuration file (defaults are used when it does not exist)
    #[arg(short, long, env = "GATEWAY_CONFIG", default_value = "config/gateway.yaml")]
    config: PathBuf,

    /// Run database migrations and exit
    #[arg(long)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = Config::load(Some(&args.config))
        .await
        .with_context(|| format!("failed to load configuration from {}", args.config.display()))?;
    init_tracing(&config.gateway.logging).context("failed to initialise logging")?;

    info!(version = catalog_gateway::VERSION, "Starting catalog gateway");

    let server = HttpServer::new(&config)
        .await
        .context("failed to initialise storage")?;
    server.migrate().await.context("database migration failed")?;

    if args.migrate {
        info!("Migrations applied, exiting");
        return Ok(());
    }

    if config.gateway.batch.warm_cache_on_startup {
        if let Err(e) = server.warm_cache().await {
            warn!("Cache warm-up failed, continuing with a cold cache: {}", e);
        }
    }

    server.start().await.context("HTTP server failed")?;
    Ok(())
}
