//! Integration tests for report requests against a real ledger.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use reportgen_core::report::ReportParams;
use reportgen_core::task::{
    CORRELATION_ID_METADATA_KEY, NAMESPACE_METADATA_KEY, REPORT_GENERATOR_TOPIC,
    REPORT_TYPE_METADATA_KEY,
};
use reportgen_test_support::FailingTaskPublisher;
use sqlx::PgPool;

const REPORTS: &str = "/api/v1/reports";

fn vulnerability_request() -> serde_json::Value {
    serde_json::json!({
        "report_type": "vulnerability",
        "duration": "7d",
        "filters": "severity=high"
    })
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_generate_report_round_trip(pool: PgPool) {
    let (app, publisher) = common::build_test_app(pool);

    // POST /api/v1/reports
    let (status, json) =
        common::post_json(app.clone(), "acme", REPORTS, &vulnerability_request()).await;

    assert_eq!(status, StatusCode::OK);
    let report_id = json["report_id"].as_str().unwrap().to_owned();
    assert_eq!(report_id, "report-0001");

    // GET /api/v1/reports/{report_id}: verify the persisted record
    let (status, json) =
        common::get_json(app, "acme", &format!("{REPORTS}/{report_id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["report_id"], report_id);
    assert_eq!(json["type"], "vulnerability");
    assert_eq!(json["status"], "starting");
    assert_eq!(json["filters"], "severity=high");
    assert_eq!(json["duration"], "7d");
    assert_eq!(json["created_at"], 1_768_471_200_000_i64);

    // Exactly one task on the report-generation topic
    let published = publisher.published();
    assert_eq!(published.len(), 1);
    let (topic, message) = &published[0];
    assert_eq!(topic, REPORT_GENERATOR_TOPIC);
    assert_eq!(message.metadata_value(NAMESPACE_METADATA_KEY), Some("acme"));
    assert_eq!(
        message.metadata_value(REPORT_TYPE_METADATA_KEY),
        Some("vulnerability")
    );
    assert!(message.metadata_value(CORRELATION_ID_METADATA_KEY).is_some());

    let params: ReportParams = serde_json::from_slice(&message.payload).unwrap();
    assert_eq!(params.report_id, report_id);
    assert_eq!(params.report_type, "vulnerability");
    assert_eq!(params.duration, "7d");
    assert_eq!(params.filters, "severity=high");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_generate_report_stores_record_under_caller_namespace(pool: PgPool) {
    let (app, _) = common::build_test_app(pool.clone());

    let (status, _) = common::post_json(app, "acme", REPORTS, &vulnerability_request()).await;
    assert_eq!(status, StatusCode::OK);

    let rows: Vec<(String, String, String)> = sqlx::query_as(
        "SELECT namespace, label, record_key FROM ledger_records ORDER BY inserted_at",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert_eq!(
        rows,
        vec![(
            "acme".to_owned(),
            "Report".to_owned(),
            "report-0001".to_owned()
        )]
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_generate_report_invalid_request_creates_nothing(pool: PgPool) {
    let (app, publisher) = common::build_test_app(pool.clone());

    let (status, json) = common::post_json(
        app,
        "acme",
        REPORTS,
        &serde_json::json!({ "report_type": "", "duration": "7d" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
    assert!(publisher.published().is_empty());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ledger_records")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_generate_report_without_namespace_returns_400(pool: PgPool) {
    let (app, publisher) = common::build_test_app(pool);

    let request = axum::http::Request::builder()
        .method("POST")
        .uri(REPORTS)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(&vulnerability_request()).unwrap(),
        ))
        .unwrap();

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(publisher.published().is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_generate_report_publish_failure_leaves_starting_record(pool: PgPool) {
    let app = common::build_test_app_with_publisher(pool, Arc::new(FailingTaskPublisher));

    let (status, json) =
        common::post_json(app.clone(), "acme", REPORTS, &vulnerability_request()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "publish_error");

    // The record committed before publishing is still there.
    let (status, json) = common::get_json(app, "acme", &format!("{REPORTS}/report-0001")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "starting");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_get_nonexistent_report_returns_404(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);

    let (status, json) = common::get_json(app, "acme", &format!("{REPORTS}/missing")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "report_not_found");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_reports_returns_created_minus_deleted(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);

    for _ in 0..3 {
        let (status, _) =
            common::post_json(app.clone(), "acme", REPORTS, &vulnerability_request()).await;
        assert_eq!(status, StatusCode::OK);
    }

    let status = common::delete(app.clone(), "acme", &format!("{REPORTS}/report-0002")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, json) = common::get_json(app, "acme", REPORTS).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["report_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["report-0001", "report-0003"]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_reports_skips_malformed_records(pool: PgPool) {
    let (app, _) = common::build_test_app(pool.clone());

    common::post_json(app.clone(), "acme", REPORTS, &vulnerability_request()).await;
    sqlx::query(
        "INSERT INTO ledger_records (namespace, label, record_key, properties) \
         VALUES ('acme', 'Report', 'broken', '{\"report_id\": \"broken\"}'::jsonb)",
    )
    .execute(&pool)
    .await
    .unwrap();

    let (status, json) = common::get_json(app.clone(), "acme", REPORTS).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);

    let (status, _) = common::get_json(app, "acme", &format!("{REPORTS}/broken")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_reports_filters_by_status(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);

    common::post_json(app.clone(), "acme", REPORTS, &vulnerability_request()).await;

    let (status, json) = common::get_json(app.clone(), "acme", &format!("{REPORTS}?status=starting")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);

    let (status, json) = common::get_json(app, "acme", &format!("{REPORTS}?status=success")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_delete_is_idempotent(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);

    common::post_json(app.clone(), "acme", REPORTS, &vulnerability_request()).await;
    let uri = format!("{REPORTS}/report-0001");

    assert_eq!(
        common::delete(app.clone(), "acme", &uri).await,
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        common::delete(app.clone(), "acme", &uri).await,
        StatusCode::NO_CONTENT
    );

    let (status, _) = common::get_json(app, "acme", &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_reports_are_isolated_per_namespace(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);

    common::post_json(app.clone(), "acme", REPORTS, &vulnerability_request()).await;

    let (status, _) = common::get_json(app.clone(), "globex", &format!("{REPORTS}/report-0001")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = common::get_json(app.clone(), "globex", REPORTS).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json.as_array().unwrap().is_empty());

    // Deleting from another namespace leaves acme's record in place.
    common::delete(app.clone(), "globex", &format!("{REPORTS}/report-0001")).await;
    let (status, _) = common::get_json(app, "acme", &format!("{REPORTS}/report-0001")).await;
    assert_eq!(status, StatusCode::OK);
}
