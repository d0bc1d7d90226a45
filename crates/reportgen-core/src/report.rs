//! Report data model and its mapping to ledger record properties.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RecordShapeError;

/// Label tagging report records in the ledger.
pub const REPORT_LABEL: &str = "Report";

/// Lifecycle of a report job.
///
/// This service only ever writes `Starting`; later transitions belong to
/// the downstream generation worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Recorded, task dispatched or about to be.
    Starting,
    /// Picked up by the worker.
    Generating,
    /// Report produced.
    Success,
    /// Generation failed.
    Failure,
}

impl ReportStatus {
    /// Returns the stored string form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Generating => "generating",
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted report record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Opaque unique identity, the sole lookup key.
    pub report_id: String,
    /// Report format/content class.
    #[serde(rename = "type")]
    pub report_type: String,
    /// Current lifecycle status.
    pub status: ReportStatus,
    /// Caller's filter expression, stored verbatim.
    pub filters: String,
    /// Bounding time window, stored verbatim.
    pub duration: String,
    /// Server-assigned creation time, stored as epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Report {
    /// Decodes a report from flat ledger record properties.
    ///
    /// Properties the report shape does not know about are ignored, so
    /// fields added by the downstream worker do not break reads.
    ///
    /// # Errors
    ///
    /// Returns `RecordShapeError` if a field is missing, has the wrong type
    /// or the status is unknown.
    pub fn from_properties(properties: serde_json::Value) -> Result<Self, RecordShapeError> {
        Ok(serde_json::from_value(properties)?)
    }

    /// Encodes the report as flat ledger record properties.
    #[must_use]
    pub fn to_properties(&self) -> serde_json::Value {
        serde_json::json!({
            "report_id": self.report_id,
            "type": self.report_type,
            "status": self.status.as_str(),
            "filters": self.filters,
            "duration": self.duration,
            "created_at": self.created_at.timestamp_millis(),
        })
    }
}

/// Fields supplied when creating a report record. The ledger assigns
/// `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReport {
    /// Identity minted by the orchestrator.
    pub report_id: String,
    /// Report format/content class.
    pub report_type: String,
    /// Initial status.
    pub status: ReportStatus,
    /// Caller's filter expression.
    pub filters: String,
    /// Bounding time window.
    pub duration: String,
}

impl NewReport {
    /// Completes the record with its creation time.
    #[must_use]
    pub fn stamp(&self, created_at: DateTime<Utc>) -> Report {
        Report {
            report_id: self.report_id.clone(),
            report_type: self.report_type.clone(),
            status: self.status,
            filters: self.filters.clone(),
            duration: self.duration.clone(),
            created_at,
        }
    }
}

/// Payload of a report-generation task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportParams {
    /// Identity of the ledger record the worker updates.
    pub report_id: String,
    /// Report format/content class.
    pub report_type: String,
    /// Bounding time window.
    pub duration: String,
    /// Caller's filter expression.
    pub filters: String,
}
