//! linkvault server binary
//!
//! Configuration: optional YAML file at `$LINKVAULT_CONFIG`, overridden by
//! `ACCESS_TOKEN`, `LINKVAULT_BIND`, `LINKVAULT_DATA_FILE` and
//! `LINKVAULT_SECURE_COOKIES`. Log verbosity follows `RUST_LOG`.

use anyhow::{Context, Result};
use linkvault::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("linkvault=info,tower_http=info")),
        )
        .init();

    let config = VaultConfig::load().context("failed to load configuration")?;
    tracing::info!(?config, "configuration loaded");

    ServerBuilder::new(config).serve().await
}
