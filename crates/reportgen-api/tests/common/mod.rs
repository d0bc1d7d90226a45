//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use reportgen_api::namespace::NamespaceResolver;
use reportgen_api::state::AppState;
use reportgen_core::clock::Clock;
use reportgen_core::task::{REPORT_GENERATOR_TOPIC, TaskPublisher};
use reportgen_ledger::pg_report_ledger::PgLedgerDirectory;
use reportgen_test_support::{FixedClock, RecordingTaskPublisher, SequenceIdGenerator};
use sqlx::PgPool;
use tower::ServiceExt;

/// Namespace header sent by the helpers.
pub const NAMESPACE_HEADER: &str = "x-namespace";

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock::default())
}

/// Build the full app router with a real `PgLedgerDirectory`, a recording
/// publisher and deterministic ids. The publisher is returned for
/// assertions on published tasks.
pub fn build_test_app(pool: PgPool) -> (Router, Arc<RecordingTaskPublisher>) {
    let publisher = Arc::new(RecordingTaskPublisher::new());
    let app = build_test_app_with_publisher(pool, publisher.clone());
    (app, publisher)
}

/// Build the full app router publishing through `task_publisher`.
pub fn build_test_app_with_publisher(
    pool: PgPool,
    task_publisher: Arc<dyn TaskPublisher>,
) -> Router {
    let app_state = AppState::new(
        Arc::new(SequenceIdGenerator::new()),
        Arc::new(PgLedgerDirectory::new(pool, fixed_clock())),
        task_publisher,
        NamespaceResolver::default(),
        REPORT_GENERATOR_TOPIC,
    );

    reportgen_api::build_router(app_state)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request with a JSON body as `namespace` and return the
/// response.
pub async fn post_json(
    app: Router,
    namespace: &str,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header(NAMESPACE_HEADER, namespace)
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a GET request as `namespace` and return the response.
pub async fn get_json(app: Router, namespace: &str, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header(NAMESPACE_HEADER, namespace)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a DELETE request as `namespace` and return the status.
pub async fn delete(app: Router, namespace: &str, uri: &str) -> StatusCode {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(NAMESPACE_HEADER, namespace)
        .body(Body::empty())
        .unwrap();

    send(app, request).await.0
}
