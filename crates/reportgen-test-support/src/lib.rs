//! Shared test doubles and utilities for reportgen.

mod clock;
mod ids;
mod ledger;
mod publisher;

pub use clock::FixedClock;
pub use ids::SequenceIdGenerator;
pub use ledger::{
    FailingReportLedger, InMemoryLedgerDirectory, InMemoryReportLedger, StaticLedgerDirectory,
};
pub use publisher::{FailingTaskPublisher, RecordingTaskPublisher};
