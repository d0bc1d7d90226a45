//! `PostgreSQL` implementation of the `ReportLedger` and `LedgerDirectory`
//! traits.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, error, warn};

use reportgen_core::clock::Clock;
use reportgen_core::error::ReportError;
use reportgen_core::ledger::{LedgerDirectory, ReportLedger};
use reportgen_core::namespace::Namespace;
use reportgen_core::report::{NewReport, REPORT_LABEL, Report};

const INSERT_RECORD: &str = r"
INSERT INTO ledger_records (namespace, label, record_key, properties)
VALUES ($1, $2, $3, $4)
";

const SELECT_RECORD: &str = r"
SELECT properties
FROM ledger_records
WHERE namespace = $1 AND label = $2 AND record_key = $3
";

const SELECT_RECORDS: &str = r"
SELECT record_key, properties
FROM ledger_records
WHERE namespace = $1 AND label = $2
ORDER BY inserted_at
";

const DELETE_RECORD: &str = r"
DELETE FROM ledger_records
WHERE namespace = $1 AND label = $2 AND record_key = $3
";

/// Hands out namespace-scoped `PgReportLedger`s sharing one pool.
#[derive(Clone)]
pub struct PgLedgerDirectory {
    pool: PgPool,
    clock: Arc<dyn Clock>,
}

impl PgLedgerDirectory {
    /// Creates a new `PgLedgerDirectory`.
    #[must_use]
    pub fn new(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

impl fmt::Debug for PgLedgerDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgLedgerDirectory")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl LedgerDirectory for PgLedgerDirectory {
    fn ledger_for(&self, namespace: &Namespace) -> Result<Arc<dyn ReportLedger>, ReportError> {
        let ledger: Arc<dyn ReportLedger> = Arc::new(PgReportLedger::new(
            self.pool.clone(),
            Arc::clone(&self.clock),
            namespace.clone(),
        ));
        Ok(ledger)
    }
}

/// PostgreSQL-backed report ledger for a single namespace.
#[derive(Clone)]
pub struct PgReportLedger {
    pool: PgPool,
    clock: Arc<dyn Clock>,
    namespace: Namespace,
}

impl PgReportLedger {
    /// Creates a new `PgReportLedger` scoped to `namespace`.
    #[must_use]
    pub fn new(pool: PgPool, clock: Arc<dyn Clock>, namespace: Namespace) -> Self {
        Self {
            pool,
            clock,
            namespace,
        }
    }

    fn store_error(&self, operation: &'static str, err: &sqlx::Error) -> ReportError {
        error!(namespace = %self.namespace, operation, error = %err, "ledger operation failed");
        ReportError::Store(format!("{operation}: {err}"))
    }
}

impl fmt::Debug for PgReportLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgReportLedger")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ReportLedger for PgReportLedger {
    async fn create(&self, report: &NewReport) -> Result<(), ReportError> {
        let properties = report.stamp(self.clock.now()).to_properties();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| self.store_error("begin transaction", &e))?;

        sqlx::query(INSERT_RECORD)
            .bind(self.namespace.as_str())
            .bind(REPORT_LABEL)
            .bind(report.report_id.as_str())
            .bind(properties)
            .execute(&mut *tx)
            .await
            .map_err(|e| self.store_error("insert report", &e))?;

        tx.commit()
            .await
            .map_err(|e| self.store_error("commit transaction", &e))?;

        debug!(namespace = %self.namespace, report_id = %report.report_id, "report record created");
        Ok(())
    }

    async fn get(&self, report_id: &str) -> Result<Report, ReportError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| self.store_error("begin transaction", &e))?;

        let row: Option<(serde_json::Value,)> = sqlx::query_as(SELECT_RECORD)
            .bind(self.namespace.as_str())
            .bind(REPORT_LABEL)
            .bind(report_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| self.store_error("select report", &e))?;

        tx.commit()
            .await
            .map_err(|e| self.store_error("commit transaction", &e))?;

        let Some((properties,)) = row else {
            return Err(ReportError::NotFound(report_id.to_owned()));
        };

        Report::from_properties(properties).map_err(|e| {
            warn!(namespace = %self.namespace, report_id, error = %e, "malformed report record");
            ReportError::NotFound(report_id.to_owned())
        })
    }

    async fn list(&self) -> Result<Vec<Report>, ReportError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| self.store_error("begin transaction", &e))?;

        let rows: Vec<(String, serde_json::Value)> = sqlx::query_as(SELECT_RECORDS)
            .bind(self.namespace.as_str())
            .bind(REPORT_LABEL)
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| self.store_error("select reports", &e))?;

        tx.commit()
            .await
            .map_err(|e| self.store_error("commit transaction", &e))?;

        let reports = rows
            .into_iter()
            .filter_map(
                |(record_key, properties)| match Report::from_properties(properties) {
                    Ok(report) => Some(report),
                    Err(e) => {
                        warn!(
                            namespace = %self.namespace,
                            record_key = %record_key,
                            error = %e,
                            "skipping malformed report record"
                        );
                        None
                    }
                },
            )
            .collect();

        Ok(reports)
    }

    async fn delete(&self, report_id: &str) -> Result<(), ReportError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| self.store_error("begin transaction", &e))?;

        let result = sqlx::query(DELETE_RECORD)
            .bind(self.namespace.as_str())
            .bind(REPORT_LABEL)
            .bind(report_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| self.store_error("delete report", &e))?;

        tx.commit()
            .await
            .map_err(|e| self.store_error("commit transaction", &e))?;

        debug!(
            namespace = %self.namespace,
            report_id,
            rows = result.rows_affected(),
            "report record deleted"
        );
        Ok(())
    }
}
