//! Tenant namespace resolution from request headers.

use axum::http::{HeaderMap, HeaderName};
use reportgen_core::error::ReportError;
use reportgen_core::namespace::Namespace;
use tracing::warn;

/// Header consulted when no other is configured.
pub const DEFAULT_NAMESPACE_HEADER: &str = "x-namespace";

/// Extracts the caller's namespace from a configured request header.
///
/// Authentication sits in front of this service and is expected to set the
/// header; this type only reads and validates it.
#[derive(Debug, Clone)]
pub struct NamespaceResolver {
    header: HeaderName,
}

impl NamespaceResolver {
    /// Creates a resolver reading `header`.
    #[must_use]
    pub fn new(header: HeaderName) -> Self {
        Self { header }
    }

    /// Returns the header this resolver reads.
    #[must_use]
    pub fn header(&self) -> &HeaderName {
        &self.header
    }

    /// Resolves the namespace for a request.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::NamespaceResolution` if the header is absent,
    /// not valid text or not a valid namespace.
    pub fn resolve(&self, headers: &HeaderMap) -> Result<Namespace, ReportError> {
        let result = headers
            .get(&self.header)
            .ok_or_else(|| {
                ReportError::NamespaceResolution(format!("missing `{}` header", self.header))
            })
            .and_then(|value| {
                value.to_str().map_err(|_| {
                    ReportError::NamespaceResolution(format!(
                        "`{}` header is not valid text",
                        self.header
                    ))
                })
            })
            .and_then(Namespace::parse);

        result.inspect_err(|e| warn!(header = %self.header, error = %e, "namespace resolution failed"))
    }
}

impl Default for NamespaceResolver {
    fn default() -> Self {
        Self::new(HeaderName::from_static(DEFAULT_NAMESPACE_HEADER))
    }
}
