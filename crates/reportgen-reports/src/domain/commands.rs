//! Commands for report orchestration.

use reportgen_core::command::Command;
use reportgen_core::error::ReportError;
use reportgen_core::namespace::Namespace;
use uuid::Uuid;

use crate::domain::validation;

/// Command to record a report job and dispatch its generation task.
#[derive(Debug, Clone)]
pub struct GenerateReport {
    /// The correlation ID stamped on the dispatched task.
    pub correlation_id: Uuid,
    /// The caller's resolved tenant namespace.
    pub namespace: Namespace,
    /// Report format/content class.
    pub report_type: String,
    /// Bounding time window.
    pub duration: String,
    /// Caller's filter expression, passed through verbatim.
    pub filters: String,
}

impl GenerateReport {
    /// Validates the request shape.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Validation` naming the first bad field.
    pub fn validate(&self) -> Result<(), ReportError> {
        validation::validate_report_type(&self.report_type)?;
        validation::validate_duration(&self.duration)?;
        validation::validate_filters(&self.filters)
    }
}

impl Command for GenerateReport {
    fn command_type(&self) -> &'static str {
        "reports.generate_report"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to delete a report record.
#[derive(Debug, Clone)]
pub struct DeleteReport {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The report identity.
    pub report_id: String,
}

impl Command for DeleteReport {
    fn command_type(&self) -> &'static str {
        "reports.delete_report"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
