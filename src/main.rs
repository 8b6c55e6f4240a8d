//! Post service binary
//!
//! Reads configuration from the YAML file named by `POSTED_CONFIG` when set,
//! otherwise from environment variables, then serves until SIGINT/SIGTERM.

use anyhow::Result;
use posted::config::ServiceConfig;
use posted::server::ServerBuilder;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::var("POSTED_CONFIG") {
        Ok(path) => ServiceConfig::from_yaml_file(&path)?,
        Err(_) => ServiceConfig::from_env()?,
    };

    tracing::info!(
        service = %config.service_name,
        timeout_secs = config.request_timeout_secs,
        "starting post service"
    );

    ServerBuilder::from_config(config).await?.serve().await
}
