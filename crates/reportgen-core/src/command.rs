//! Command abstractions.

use uuid::Uuid;

/// Trait that all report commands implement.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// The type name for this command (for logging).
    fn command_type(&self) -> &'static str;

    /// Correlation ID tracing this command from request to task consumer.
    fn correlation_id(&self) -> Uuid;
}
