//! Outbox relay worker
//!
//! Drains the transactional outbox to the broker. Command handlers only
//! stage notifications; this worker is what actually delivers them, so it
//! runs for as long as the core is accepting commands.

use sqlx::postgres::PgPoolOptions;

use account_core::outbox::{OutboxRelay, OutboxRepository};
use account_core::publisher::RedisPublisher;
use account_core::{db, Config};

/// Initialize tracing/logging
fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    let config = Config::from_env()?;

    tracing::info!("Starting outbox relay worker");
    tracing::info!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    if !db::check_schema(&pool).await? {
        tracing::error!("Database schema is not complete. Please run migrations.");
        return Err(anyhow::anyhow!("Database schema incomplete"));
    }

    tracing::info!("Database connected successfully");
    tracing::info!("Connecting to broker at {}", config.redis_url);

    let publisher = RedisPublisher::connect(&config.redis_url)
        .await
        .map_err(|e| anyhow::anyhow!("Broker connection failed: {e}"))?;

    let relay = OutboxRelay::with_config(
        OutboxRepository::new(pool.clone()),
        publisher,
        config.relay.clone(),
    );

    tokio::select! {
        _ = relay.run() => {}
        _ = shutdown_signal() => {}
    }

    tracing::info!("Relay shutting down...");
    pool.close().await;
    tracing::info!("Database connections closed. Goodbye!");

    Ok(())
}

/// Shutdown signal handler for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
