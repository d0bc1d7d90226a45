//! Query handlers for report records.
//!
//! Thin pass-throughs to the ledger with request-shape validation.

use reportgen_core::error::ReportError;
use reportgen_core::ledger::ReportLedger;
use reportgen_core::report::Report;
use tracing::{debug, error};

use crate::domain::queries::ListReports;
use crate::domain::validation;

/// Retrieves a report by its identity.
///
/// # Errors
///
/// Returns `ReportError::Validation` for a blank id,
/// `ReportError::NotFound` if no well-formed record matches and
/// `ReportError::Store` if the ledger fails.
pub async fn get_report(report_id: &str, ledger: &dyn ReportLedger) -> Result<Report, ReportError> {
    validation::validate_report_id(report_id)?;

    ledger.get(report_id).await.inspect_err(|e| match e {
        ReportError::NotFound(_) => debug!(report_id, "report not found"),
        other => error!(report_id, error = %other, "failed to fetch report"),
    })
}

/// Lists the tenant's reports, optionally restricted to one status.
///
/// Malformed records are skipped by the ledger; only a ledger failure
/// fails the listing.
///
/// # Errors
///
/// Returns `ReportError::Store` if the ledger fails.
pub async fn list_reports(
    query: &ListReports,
    ledger: &dyn ReportLedger,
) -> Result<Vec<Report>, ReportError> {
    let reports = ledger.list().await.inspect_err(|e| {
        error!(error = %e, "failed to list reports");
    })?;

    Ok(match query.status {
        Some(status) => reports.into_iter().filter(|r| r.status == status).collect(),
        None => reports,
    })
}
