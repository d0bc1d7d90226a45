//! Queries for report records.

use reportgen_core::report::ReportStatus;
use serde::Deserialize;

/// Query listing a tenant's reports.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListReports {
    /// Only return reports in this status. Listing `starting` surfaces jobs
    /// whose task was never dispatched.
    pub status: Option<ReportStatus>,
}
