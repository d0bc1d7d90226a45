//! Ledger abstractions: keyed transactional storage of report records.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ReportError;
use crate::namespace::Namespace;
use crate::report::{NewReport, Report};

/// Keyed CRUD over report records within one tenant's ledger.
///
/// Every call runs in its own transaction that is released on every exit
/// path. No call spans more than one record.
#[async_trait]
pub trait ReportLedger: Send + Sync {
    /// Inserts a new record, stamping `created_at`.
    ///
    /// Fails with `ReportError::Store` on transaction or write failure,
    /// including an already-used `report_id`.
    async fn create(&self, report: &NewReport) -> Result<(), ReportError>;

    /// Fetches exactly one record.
    ///
    /// Zero matches and malformed records both yield `ReportError::NotFound`.
    async fn get(&self, report_id: &str) -> Result<Report, ReportError>;

    /// Fetches all report records in insertion order, skipping malformed
    /// ones.
    async fn list(&self) -> Result<Vec<Report>, ReportError>;

    /// Deletes a record. Deleting an unknown identity succeeds.
    async fn delete(&self, report_id: &str) -> Result<(), ReportError>;
}

/// Resolves the ledger holding a tenant's records.
pub trait LedgerDirectory: Send + Sync {
    /// Returns the ledger scoped to `namespace`.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::NamespaceResolution` if no ledger serves the
    /// namespace.
    fn ledger_for(&self, namespace: &Namespace) -> Result<Arc<dyn ReportLedger>, ReportError>;
}
