//! Identity generation.
//!
//! Report and message identities are minted through this trait so tests
//! can inject predictable values.

use uuid::Uuid;

/// Mints fresh identities for reports and task messages.
pub trait IdGenerator: Send + Sync {
    /// Returns a new, globally unique report identity.
    fn report_id(&self) -> String;

    /// Returns a new task message identity, independent of any report id.
    fn message_id(&self) -> Uuid;
}

/// Production generator backed by random (v4) UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn report_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    fn message_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}
