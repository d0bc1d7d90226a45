//! Task messages and the publisher that puts them on the bus.

use std::collections::BTreeMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ReportError;

/// Topic the report-generation worker consumes.
pub const REPORT_GENERATOR_TOPIC: &str = "report_generator";

/// Metadata key carrying the tenant namespace.
pub const NAMESPACE_METADATA_KEY: &str = "namespace";

/// Metadata key carrying the report type.
pub const REPORT_TYPE_METADATA_KEY: &str = "report_type";

/// Metadata key carrying the correlation identifier.
pub const CORRELATION_ID_METADATA_KEY: &str = "correlation_id";

/// An opaque payload plus string metadata, published once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskMessage {
    /// Message identity for bus deduplication and tracing.
    pub message_id: Uuid,
    /// Serialized task parameters.
    pub payload: Vec<u8>,
    /// String-keyed metadata.
    pub metadata: BTreeMap<String, String>,
}

impl TaskMessage {
    /// Creates a message with empty metadata.
    #[must_use]
    pub fn new(message_id: Uuid, payload: Vec<u8>) -> Self {
        Self {
            message_id,
            payload,
            metadata: BTreeMap::new(),
        }
    }

    /// Adds a metadata entry, replacing any previous value for `key`.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Stamps the correlation identifier.
    #[must_use]
    pub fn with_correlation_id(self, correlation_id: Uuid) -> Self {
        self.with_metadata(CORRELATION_ID_METADATA_KEY, correlation_id.to_string())
    }

    /// Returns the metadata value for `key`, if any.
    #[must_use]
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

/// Puts task messages on a named topic.
///
/// Delivery guarantees (at-least-once, ordering) belong to the
/// implementation's backend.
#[async_trait]
pub trait TaskPublisher: Send + Sync {
    /// Publishes `message` to `topic`.
    ///
    /// Fails with `ReportError::Publish` if the bus does not accept it.
    async fn publish(&self, topic: &str, message: &TaskMessage) -> Result<(), ReportError>;
}
