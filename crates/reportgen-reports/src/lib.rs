//! reportgen: report request orchestration.
//!
//! Records report jobs in the tenant's ledger and dispatches the
//! generation task to the bus. Get, list and delete pass straight
//! through to the ledger.

pub mod application;
pub mod domain;
