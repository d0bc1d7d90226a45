//! Shared application state.

use std::sync::Arc;

use reportgen_core::ids::IdGenerator;
use reportgen_core::ledger::LedgerDirectory;
use reportgen_core::task::TaskPublisher;

use crate::namespace::NamespaceResolver;

/// Application state shared across all request handlers.
///
/// Holds long-lived handles; handlers borrow them per request.
#[derive(Clone)]
pub struct AppState {
    /// Mints report and message identities.
    pub ids: Arc<dyn IdGenerator>,
    /// Resolves each tenant's ledger.
    pub ledgers: Arc<dyn LedgerDirectory>,
    /// Publishes report-generation tasks.
    pub task_publisher: Arc<dyn TaskPublisher>,
    /// Reads the caller's namespace from request headers.
    pub namespace_resolver: NamespaceResolver,
    /// Topic report-generation tasks are published to.
    pub report_topic: Arc<str>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        ids: Arc<dyn IdGenerator>,
        ledgers: Arc<dyn LedgerDirectory>,
        task_publisher: Arc<dyn TaskPublisher>,
        namespace_resolver: NamespaceResolver,
        report_topic: &str,
    ) -> Self {
        Self {
            ids,
            ledgers,
            task_publisher,
            namespace_resolver,
            report_topic: Arc::from(report_topic),
        }
    }
}
