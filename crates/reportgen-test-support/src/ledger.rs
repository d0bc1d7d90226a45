//! Test ledgers: in-memory `ReportLedger` and `LedgerDirectory`
//! implementations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reportgen_core::clock::Clock;
use reportgen_core::error::ReportError;
use reportgen_core::ledger::{LedgerDirectory, ReportLedger};
use reportgen_core::namespace::Namespace;
use reportgen_core::report::{NewReport, Report};

use crate::clock::FixedClock;

/// A ledger that keeps raw record properties in insertion order.
///
/// Records are stored as JSON exactly like the PostgreSQL ledger stores
/// them, so `insert_raw` can plant malformed records.
#[derive(Debug, Default)]
pub struct InMemoryReportLedger {
    clock: FixedClock,
    records: Mutex<Vec<(String, serde_json::Value)>>,
}

impl InMemoryReportLedger {
    /// Creates an empty ledger that stamps records with `clock`.
    #[must_use]
    pub fn new(clock: FixedClock) -> Self {
        Self {
            clock,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Stores `properties` under `report_id` without any shape check.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn insert_raw(&self, report_id: &str, properties: serde_json::Value) {
        self.records
            .lock()
            .unwrap()
            .push((report_id.to_owned(), properties));
    }

    /// Returns a snapshot of all stored records.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn records(&self) -> Vec<(String, serde_json::Value)> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportLedger for InMemoryReportLedger {
    async fn create(&self, report: &NewReport) -> Result<(), ReportError> {
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|(key, _)| *key == report.report_id) {
            return Err(ReportError::Store(format!(
                "duplicate report_id {}",
                report.report_id
            )));
        }
        let properties = report.stamp(self.clock.now()).to_properties();
        records.push((report.report_id.clone(), properties));
        Ok(())
    }

    async fn get(&self, report_id: &str) -> Result<Report, ReportError> {
        let records = self.records.lock().unwrap();
        records
            .iter()
            .find(|(key, _)| key == report_id)
            .and_then(|(_, properties)| Report::from_properties(properties.clone()).ok())
            .ok_or_else(|| ReportError::NotFound(report_id.to_owned()))
    }

    async fn list(&self) -> Result<Vec<Report>, ReportError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter_map(|(_, properties)| Report::from_properties(properties.clone()).ok())
            .collect())
    }

    async fn delete(&self, report_id: &str) -> Result<(), ReportError> {
        self.records
            .lock()
            .unwrap()
            .retain(|(key, _)| key != report_id);
        Ok(())
    }
}

/// A ledger that always returns a store error. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingReportLedger;

#[async_trait]
impl ReportLedger for FailingReportLedger {
    async fn create(&self, _report: &NewReport) -> Result<(), ReportError> {
        Err(ReportError::Store("connection refused".into()))
    }

    async fn get(&self, _report_id: &str) -> Result<Report, ReportError> {
        Err(ReportError::Store("connection refused".into()))
    }

    async fn list(&self) -> Result<Vec<Report>, ReportError> {
        Err(ReportError::Store("connection refused".into()))
    }

    async fn delete(&self, _report_id: &str) -> Result<(), ReportError> {
        Err(ReportError::Store("connection refused".into()))
    }
}

/// A directory that lazily creates one `InMemoryReportLedger` per
/// namespace.
#[derive(Debug, Default)]
pub struct InMemoryLedgerDirectory {
    clock: FixedClock,
    ledgers: Mutex<HashMap<Namespace, Arc<InMemoryReportLedger>>>,
}

impl InMemoryLedgerDirectory {
    /// Creates an empty directory whose ledgers stamp records with `clock`.
    #[must_use]
    pub fn new(clock: FixedClock) -> Self {
        Self {
            clock,
            ledgers: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the concrete ledger for `namespace`, creating it if needed.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn ledger(&self, namespace: &Namespace) -> Arc<InMemoryReportLedger> {
        Arc::clone(
            self.ledgers
                .lock()
                .unwrap()
                .entry(namespace.clone())
                .or_insert_with(|| Arc::new(InMemoryReportLedger::new(self.clock))),
        )
    }
}

impl LedgerDirectory for InMemoryLedgerDirectory {
    fn ledger_for(&self, namespace: &Namespace) -> Result<Arc<dyn ReportLedger>, ReportError> {
        let ledger: Arc<dyn ReportLedger> = self.ledger(namespace);
        Ok(ledger)
    }
}

/// A directory that hands out the same ledger for every namespace.
pub struct StaticLedgerDirectory(pub Arc<dyn ReportLedger>);

impl LedgerDirectory for StaticLedgerDirectory {
    fn ledger_for(&self, _namespace: &Namespace) -> Result<Arc<dyn ReportLedger>, ReportError> {
        Ok(Arc::clone(&self.0))
    }
}
