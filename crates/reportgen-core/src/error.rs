//! Error types shared by the ledger, the publisher and the orchestrator.

use thiserror::Error;

/// Top-level error for report operations.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Malformed or missing input. Raised before any side effect.
    #[error("validation error: {0}")]
    Validation(String),

    /// The caller's tenant namespace could not be resolved.
    #[error("namespace resolution error: {0}")]
    NamespaceResolution(String),

    /// Ledger transaction begin, query or commit failed.
    #[error("store error: {0}")]
    Store(String),

    /// No well-formed report record matches the requested identity.
    #[error("report not found: {0}")]
    NotFound(String),

    /// The bus rejected or could not accept a task message.
    #[error("publish error: {0}")]
    Publish(String),
}

impl ReportError {
    /// Returns the machine-readable code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NamespaceResolution(_) => "namespace_resolution_error",
            Self::Store(_) => "store_error",
            Self::NotFound(_) => "report_not_found",
            Self::Publish(_) => "publish_error",
        }
    }
}

/// A ledger record whose properties do not match the report shape.
///
/// Never surfaced to callers: the ledger adapter turns it into
/// `ReportError::NotFound` on get and skips the record on list.
#[derive(Debug, Error)]
#[error("invalid report properties: {0}")]
pub struct RecordShapeError(#[from] pub serde_json::Error);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct_per_variant() {
        let codes = [
            ReportError::Validation(String::new()).code(),
            ReportError::NamespaceResolution(String::new()).code(),
            ReportError::Store(String::new()).code(),
            ReportError::NotFound(String::new()).code(),
            ReportError::Publish(String::new()).code(),
        ];
        let mut deduped = codes.to_vec();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), codes.len());
    }

    #[test]
    fn test_not_found_message_names_the_report() {
        let err = ReportError::NotFound("abc".into());
        assert_eq!(err.to_string(), "report not found: abc");
    }
}
