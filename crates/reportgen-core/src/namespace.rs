//! Tenant namespace.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// Maximum namespace length accepted from callers.
pub const MAX_NAMESPACE_LEN: usize = 64;

/// Tenant scope for a request.
///
/// Selects the ledger partition a request reads and writes, and travels in
/// task metadata so the consumer resolves the same partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace(String);

impl Namespace {
    /// Parses a namespace, accepting ASCII alphanumerics, `-` and `_`.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::NamespaceResolution` if the value is empty,
    /// too long or contains other characters.
    pub fn parse(raw: &str) -> Result<Self, ReportError> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(ReportError::NamespaceResolution(
                "namespace is empty".to_owned(),
            ));
        }
        if value.len() > MAX_NAMESPACE_LEN {
            return Err(ReportError::NamespaceResolution(format!(
                "namespace exceeds {MAX_NAMESPACE_LEN} characters"
            )));
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ReportError::NamespaceResolution(format!(
                "namespace `{value}` contains invalid characters"
            )));
        }
        Ok(Self(value.to_owned()))
    }

    /// Returns the namespace as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
