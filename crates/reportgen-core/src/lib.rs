//! reportgen Core: shared abstractions.
//!
//! This crate defines the report data model and the traits the
//! orchestrator depends on: the ledger, the task publisher, the clock and
//! identity generation. It contains no infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod ids;
pub mod ledger;
pub mod namespace;
pub mod report;
pub mod task;
