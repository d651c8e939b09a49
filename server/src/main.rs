use std::net::SocketAddr;

use analytics_server::{
    build_app, build_cache_store, build_services, config::AppConfig,
    shutdown_signal,
};
use sql_connection::connect_postgres_db;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    info!(env = %config.app_env, "Initializing connection pools...");

    let db = connect_postgres_db(&config.database).await?;
    db.ping().await?;
    let (available, size) = db.get_pool_status();
    info!(
        postgres.available = available,
        postgres.size = size,
        "PostgreSQL connection pool initialized"
    );

    let store = build_cache_store(&config)?;
    match store.ping().await {
        Ok(()) => info!(store = store.provider_name(), "Cache store reachable"),
        Err(e) => warn!(
            store = store.provider_name(),
            error = %e,
            "Cache store unreachable at startup, serving uncached until it recovers"
        ),
    }

    let app = build_app(build_services(db.clone(), store.clone(), &config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Analytics server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close();
    db.close();
    info!("Connection pools closed, shutdown complete");

    Ok(())
}
