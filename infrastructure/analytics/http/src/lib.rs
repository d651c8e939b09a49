use std::sync::Arc;

use analytics_dao::SummarySource;
use analytics_errors::AnalyticsError;
use analytics_queries::SummaryQuery;
use analytics_query_handlers::{GetSummaryQueryHandler, SummaryCache};
use analytics_responses::{HealthResponse, SummaryResponse};
use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
    response::Json,
    routing::get,
};
use common_errors::AppError;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct AnalyticsServices {
    pub get_summary: GetSummaryQueryHandler,
}

impl AnalyticsServices {
    pub fn new(source: Arc<dyn SummarySource>, cache: SummaryCache) -> Self {
        Self {
            get_summary: GetSummaryQueryHandler::new(source, cache),
        }
    }
}

pub struct AnalyticsHandlers;

impl AnalyticsHandlers {
    /// Routes mounted under `/api/analytics`.
    pub fn routes() -> Router<AnalyticsServices> {
        Router::new()
            .route("/summary", get(get_summary))
            .method_not_allowed_fallback(not_found)
    }

    /// Analytics routes plus the health probe. Unknown paths and unsupported
    /// methods both get the JSON 404 envelope.
    pub fn app(services: AnalyticsServices) -> Router {
        Router::new()
            .nest("/api/analytics", Self::routes())
            .route("/health", get(health_check))
            .method_not_allowed_fallback(not_found)
            .fallback(not_found)
            .with_state(services)
    }
}

#[utoipa::path(
    get,
    path = "/api/analytics/summary",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Summary for the requested range", body = SummaryResponse),
        (status = 400, description = "Missing, malformed or inverted range", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "analytics"
)]
#[instrument(skip_all)]
pub async fn get_summary(
    State(services): State<AnalyticsServices>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Result<Json<SummaryResponse>, AppError> {
    // Only repeated parameters make the string-typed query fail to extract.
    let Query(query) = query.map_err(|rejection| {
        debug!(error = %rejection, "Rejected summary query string");
        AnalyticsError::missing_range()
    })?;

    let response = services.get_summary.execute(query).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Fallback for unknown routes.
pub async fn not_found() -> AppError { AppError::not_found("Not found") }
