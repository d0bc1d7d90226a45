//! reportgen Ledger: PostgreSQL-backed storage of report records.
//!
//! Records live in a single `ledger_records` table as labelled, keyed
//! property objects, partitioned by tenant namespace.

pub mod pg_report_ledger;
pub mod schema;
