//! Test id generator: predictable `IdGenerator` implementation.

use std::sync::atomic::{AtomicU64, Ordering};

use reportgen_core::ids::IdGenerator;
use uuid::Uuid;

/// Mints `report-0001`, `report-0002`, ... and message ids
/// `00000000-0000-0000-0000-000000000001`, ... from independent counters.
#[derive(Debug, Default)]
pub struct SequenceIdGenerator {
    reports: AtomicU64,
    messages: AtomicU64,
}

impl SequenceIdGenerator {
    /// Creates a generator starting at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn report_id(&self) -> String {
        let n = self.reports.fetch_add(1, Ordering::SeqCst) + 1;
        format!("report-{n:04}")
    }

    fn message_id(&self) -> Uuid {
        let n = self.messages.fetch_add(1, Ordering::SeqCst) + 1;
        Uuid::from_u128(u128::from(n))
    }
}
