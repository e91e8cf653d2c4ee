// Main entry point for the status watcher server

use std::sync::Arc;

use anyhow::{Context, Result};
use notion_client::NotionClient;
use server_core::kernel::{LogChangeSink, NotionRecordStore, Poller};
use server_core::{server::build_app, Config};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Notion status watcher");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        database_id = %config.watch.collection_id,
        interval_secs = config.watch.poll_interval.as_secs(),
        "Configuration loaded"
    );

    let notion = Arc::new(match &config.notion_base_url {
        Some(base_url) => NotionClient::with_base_url(config.notion_key.clone(), base_url.clone()),
        None => NotionClient::new(config.notion_key.clone()),
    });

    // Load the initial snapshot before anything is scheduled
    let poller = Arc::new(Poller::new(
        Arc::new(NotionRecordStore::new(notion.clone())),
        Arc::new(LogChangeSink),
        config.watch.clone(),
    ));
    let count = poller
        .initialize()
        .await
        .context("Failed to load initial task snapshot")?;
    tracing::info!(count, "Watching tasks for status changes");

    let shutdown = CancellationToken::new();
    let poller_handle = poller.clone().spawn(shutdown.clone());

    // Build application
    let app = build_app(notion, poller);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    let server_shutdown = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown signal received");
                }
                _ = server_shutdown.cancelled() => {}
            }
        })
        .await
        .context("Server error")?;

    poller_handle.shutdown().await?;
    Ok(())
}
