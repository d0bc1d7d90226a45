//! Routes for report requests.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use reportgen_core::report::Report;
use reportgen_reports::application::{command_handlers, query_handlers};
use reportgen_reports::domain::commands;
use reportgen_reports::domain::queries::ListReports;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct GenerateReportRequest {
    /// Report format/content class.
    pub report_type: String,
    /// Bounding time window, e.g. `7d`.
    pub duration: String,
    /// Filter expression; omitted means no filters.
    #[serde(default)]
    pub filters: String,
}

/// Response body for POST /.
#[derive(Debug, Serialize)]
pub struct GenerateReportResponse {
    /// Identity of the recorded report.
    pub report_id: String,
}

/// POST /
#[instrument(skip(state, headers, request))]
async fn generate_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Result<Json<GenerateReportRequest>, JsonRejection>,
) -> Result<Json<GenerateReportResponse>, ApiError> {
    let Json(request) = request?;
    let namespace = state.namespace_resolver.resolve(&headers)?;
    let ledger = state.ledgers.ledger_for(&namespace)?;

    let command = commands::GenerateReport {
        correlation_id: Uuid::new_v4(),
        namespace,
        report_type: request.report_type,
        duration: request.duration,
        filters: request.filters,
    };

    info!(
        correlation_id = %command.correlation_id,
        report_type = %command.report_type,
        "handling generate_report command"
    );

    let result = command_handlers::handle_generate_report(
        &command,
        state.ids.as_ref(),
        ledger.as_ref(),
        state.task_publisher.as_ref(),
        &state.report_topic,
    )
    .await?;

    Ok(Json(GenerateReportResponse {
        report_id: result.report_id,
    }))
}

/// GET /
#[instrument(skip(state, headers, query))]
async fn list_reports(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<ListReports>, QueryRejection>,
) -> Result<Json<Vec<Report>>, ApiError> {
    let Query(query) = query?;
    let namespace = state.namespace_resolver.resolve(&headers)?;
    let ledger = state.ledgers.ledger_for(&namespace)?;

    let reports = query_handlers::list_reports(&query, ledger.as_ref()).await?;

    Ok(Json(reports))
}

/// GET /{report_id}
#[instrument(skip(state, headers))]
async fn get_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(report_id): Path<String>,
) -> Result<Json<Report>, ApiError> {
    let namespace = state.namespace_resolver.resolve(&headers)?;
    let ledger = state.ledgers.ledger_for(&namespace)?;

    let report = query_handlers::get_report(&report_id, ledger.as_ref()).await?;

    Ok(Json(report))
}

/// DELETE /{report_id}
#[instrument(skip(state, headers))]
async fn delete_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(report_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let namespace = state.namespace_resolver.resolve(&headers)?;
    let ledger = state.ledgers.ledger_for(&namespace)?;

    let command = commands::DeleteReport {
        correlation_id: Uuid::new_v4(),
        report_id,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_report command");

    command_handlers::handle_delete_report(&command, ledger.as_ref()).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for report requests.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reports).post(generate_report))
        .route("/{report_id}", get(get_report).delete(delete_report))
}
