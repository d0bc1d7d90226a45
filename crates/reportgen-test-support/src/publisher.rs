//! Test publishers: mock `TaskPublisher` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use reportgen_core::error::ReportError;
use reportgen_core::task::{TaskMessage, TaskPublisher};

/// A publisher that records every `(topic, message)` it is given and always
/// succeeds.
#[derive(Debug, Default)]
pub struct RecordingTaskPublisher {
    published: Mutex<Vec<(String, TaskMessage)>>,
}

impl RecordingTaskPublisher {
    /// Creates a publisher with nothing recorded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all published messages.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn published(&self) -> Vec<(String, TaskMessage)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskPublisher for RecordingTaskPublisher {
    async fn publish(&self, topic: &str, message: &TaskMessage) -> Result<(), ReportError> {
        self.published
            .lock()
            .unwrap()
            .push((topic.to_owned(), message.clone()));
        Ok(())
    }
}

/// A publisher whose bus always rejects messages.
#[derive(Debug)]
pub struct FailingTaskPublisher;

#[async_trait]
impl TaskPublisher for FailingTaskPublisher {
    async fn publish(&self, _topic: &str, _message: &TaskMessage) -> Result<(), ReportError> {
        Err(ReportError::Publish("broker unavailable".into()))
    }
}
