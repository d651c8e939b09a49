use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use analytics_dao::SummarySource;
use analytics_errors::AnalyticsError;
use analytics_http::{AnalyticsHandlers, AnalyticsServices};
use analytics_models::{AnalyticsSummary, DateRange};
use analytics_query_handlers::{CacheConfig, SummaryCache};
use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use redis_connection::{CacheStore, MemoryCacheStore};
use serde_json::{Value, json};
use test_utils::FailingCacheStore;
use tower::ServiceExt;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    Layer,
    layer::{Context, SubscriberExt},
};

/// Counts `error`-level events emitted while installed.
struct ErrorCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::ERROR {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[derive(Default)]
struct StubSource {
    calls: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl SummarySource for StubSource {
    async fn summarize(
        &self, _range: &DateRange,
    ) -> Result<AnalyticsSummary, AnalyticsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AnalyticsError::Decode(
                "relation \"events\" does not exist".into(),
            ));
        }
        Ok(AnalyticsSummary::builder()
            .total_events(5)
            .unique_users(2)
            .events_by_type([("click", 3), ("view", 2)].into_iter().collect())
            .build())
    }
}

fn app(source: Arc<StubSource>, store: Arc<dyn CacheStore>) -> Router {
    let cache = SummaryCache::new(store, &CacheConfig::default());
    AnalyticsHandlers::app(AnalyticsServices::new(source, cache))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri).await
}

async fn send(
    app: &Router, method: Method, uri: &str,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

const JANUARY: &str = "/api/analytics/summary?from=2024-01-01T00:00:00Z&to=2024-01-31T23:59:59Z";

#[tokio::test]
async fn test_summary_miss_then_hit() {
    let source = Arc::new(StubSource::default());
    let app = app(source.clone(), Arc::new(MemoryCacheStore::default()));

    let (status, first) = get(&app, JANUARY).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        first,
        json!({
            "data": {
                "totalEvents": 5,
                "uniqueUsers": 2,
                "eventsByType": { "click": 3, "view": 2 }
            },
            "cached": false
        })
    );

    let (status, second) = get(&app, JANUARY).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["cached"], true);
    assert_eq!(second["data"], first["data"]);
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_parameter() {
    let app = app(
        Arc::new(StubSource::default()),
        Arc::new(MemoryCacheStore::default()),
    );

    let (status, body) =
        get(&app, "/api/analytics/summary?from=2024-01-01T00:00:00Z").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "error": {
                "message": "Query parameters \"from\" and \"to\" are required",
                "statusCode": 400
            }
        })
    );
}

#[tokio::test]
async fn test_malformed_date() {
    let app = app(
        Arc::new(StubSource::default()),
        Arc::new(MemoryCacheStore::default()),
    );

    let (status, body) = get(
        &app,
        "/api/analytics/summary?from=last-week&to=2024-01-31T00:00:00Z",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        "Invalid date format. Use ISO 8601 format (e.g., 2024-01-01T00:00:00Z)"
    );
}

#[tokio::test]
async fn test_inverted_range() {
    let source = Arc::new(StubSource::default());
    let app = app(source.clone(), Arc::new(MemoryCacheStore::default()));

    let (status, body) = get(
        &app,
        "/api/analytics/summary?from=2024-02-01T00:00:00Z&to=2024-01-01T00:00:00Z",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        "\"from\" date must be before or equal to \"to\" date"
    );
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_duplicate_parameter_rejected() {
    let app = app(
        Arc::new(StubSource::default()),
        Arc::new(MemoryCacheStore::default()),
    );

    let (status, body) = get(
        &app,
        "/api/analytics/summary?from=2024-01-01&from=2024-01-02&to=2024-01-31",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["statusCode"], 400);
}

#[tokio::test]
async fn test_cache_outage_is_invisible() {
    let source = Arc::new(StubSource::default());
    let app = app(source.clone(), Arc::new(FailingCacheStore));

    let (first_status, first) = get(&app, JANUARY).await;
    let (second_status, second) = get(&app, JANUARY).await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first["cached"], false);
    assert_eq!(second["cached"], false);
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_source_failure_is_generic_500() {
    let source = Arc::new(StubSource {
        calls: AtomicUsize::new(0),
        fail: true,
    });
    let app = app(source, Arc::new(MemoryCacheStore::default()));

    let (status, body) = get(&app, JANUARY).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({
            "error": { "message": "Internal server error", "statusCode": 500 }
        })
    );
}

#[tokio::test]
async fn test_source_failure_is_logged_once() {
    let errors = Arc::new(AtomicUsize::new(0));
    let _guard = tracing::subscriber::set_default(
        tracing_subscriber::registry().with(ErrorCounter(errors.clone())),
    );
    let source = Arc::new(StubSource {
        calls: AtomicUsize::new(0),
        fail: true,
    });
    let app = app(source, Arc::new(MemoryCacheStore::default()));

    let (status, _) = get(&app, JANUARY).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(errors.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_health() {
    let app = app(
        Arc::new(StubSource::default()),
        Arc::new(MemoryCacheStore::default()),
    );

    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = app(
        Arc::new(StubSource::default()),
        Arc::new(MemoryCacheStore::default()),
    );

    let (status, body) = get(&app, "/api/analytics/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "error": { "message": "Not found", "statusCode": 404 } })
    );
}

#[tokio::test]
async fn test_wrong_method_is_json_404() {
    let source = Arc::new(StubSource::default());
    let app = app(source.clone(), Arc::new(MemoryCacheStore::default()));

    let cases = [(Method::POST, JANUARY), (Method::DELETE, "/health")];
    for (method, uri) in cases {
        let (status, body) = send(&app, method, uri).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({ "error": { "message": "Not found", "statusCode": 404 } })
        );
    }
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}
