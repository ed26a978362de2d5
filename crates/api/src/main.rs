use std::sync::Arc;

use anyhow::Context;

use storefront_api::app::{build_app, AppState};
use storefront_api::config::ApiConfig;
use storefront_auth::InMemoryCredentialStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    storefront_observability::init();

    let config = ApiConfig::from_env().context("invalid configuration")?;
    tracing::info!(?config, "starting storefront-api");

    // Empty until users are inserted; `/me` answers 404 for unknown subjects.
    let credentials = Arc::new(InMemoryCredentialStore::new());
    let app = build_app(AppState::from_config(&config, credentials));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
