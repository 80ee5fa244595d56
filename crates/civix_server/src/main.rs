use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use civix_core::service::CivicServiceImpl;
use civix_postgres::PgStores;
use civix_server::config::ServerConfig;
use civix_server::router::build_router;
use civix_server::safesearch::GoogleSafeSearchClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("failed to connect to Postgres")?;
    tracing::info!("connected to database");

    let stores = PgStores::new(pool);
    let mut service = CivicServiceImpl::new(
        Arc::new(stores.jurisdictions),
        Arc::new(stores.services),
        Arc::new(stores.requests),
    );
    match &config.safesearch_key {
        Some(key) => {
            service = service.with_classifier(Arc::new(GoogleSafeSearchClient::new(key.clone())));
            tracing::info!("image moderation enabled");
        }
        None => tracing::warn!("CIVIX_SAFESEARCH_KEY not set; media is accepted unmoderated"),
    }

    let app = build_router(Arc::new(service), config.discovery.clone());
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "civix server listening");
    axum::serve(listener, app).await.context("server exited")?;
    Ok(())
}
