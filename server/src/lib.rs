pub mod config;

use std::sync::Arc;

use analytics_dao::{SummaryDao, SummarySource};
use analytics_http::{AnalyticsHandlers, AnalyticsServices};
use analytics_query_handlers::SummaryCache;
use axum::{Router, routing::get};
use redis_connection::{
    CacheStore, MemoryCacheStore, RedisCacheStore, connect_redis_db,
};
use sql_connection::SqlConnect;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

use crate::config::{AppConfig, CacheStoreKind};

#[derive(OpenApi)]
#[openapi(
    paths(
        analytics_http::health_check,
        analytics_http::get_summary,
    ),
    components(
        schemas(
            analytics_responses::SummaryResponse,
            analytics_responses::HealthResponse,
            analytics_models::AnalyticsSummary,
            common_errors::ApiErrorResponse,
            common_errors::ApiErrorInfo,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "analytics", description = "Event analytics summaries")
    ),
    info(
        title = "Event Analytics API",
        description = "Cached event-analytics summaries over arbitrary date ranges",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

/// Build the cache store selected by the config. Redis pools connect lazily,
/// so an unreachable server only surfaces on the first cache operation.
pub fn build_cache_store(
    config: &AppConfig,
) -> anyhow::Result<Arc<dyn CacheStore>> {
    Ok(match config.cache_store {
        CacheStoreKind::Redis => {
            Arc::new(RedisCacheStore::new(connect_redis_db(&config.redis)?))
        }
        CacheStoreKind::Memory => {
            Arc::new(MemoryCacheStore::new(config.memory.clone()))
        }
    })
}

/// Wire the read path over already constructed connections.
pub fn build_services(
    db: SqlConnect, store: Arc<dyn CacheStore>, config: &AppConfig,
) -> AnalyticsServices {
    let source: Arc<dyn SummarySource> =
        Arc::new(SummaryDao::new(db).with_query_timeout(config.query_timeout));
    let cache = SummaryCache::new(store, &config.cache);
    AnalyticsServices::new(source, cache)
}

/// Full application router: API, docs, CORS and request tracing.
pub fn build_app(services: AnalyticsServices) -> Router {
    AnalyticsHandlers::app(services)
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/docs"))
        .route(
            "/api-docs/openapi.json",
            get(|| async { axum::Json(ApiDoc::openapi()) }),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Resolves on SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
