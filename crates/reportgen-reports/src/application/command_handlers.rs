//! Command handlers for report orchestration.
//!
//! `handle_generate_report` spans two external systems. The ledger commit
//! always completes before the task is published, so a publish failure
//! leaves a `starting` record with no task rather than a task with no
//! record.

use reportgen_core::command::Command;
use reportgen_core::error::ReportError;
use reportgen_core::ids::IdGenerator;
use reportgen_core::ledger::ReportLedger;
use reportgen_core::namespace::Namespace;
use reportgen_core::report::{NewReport, ReportParams, ReportStatus};
use reportgen_core::task::{
    NAMESPACE_METADATA_KEY, REPORT_TYPE_METADATA_KEY, TaskMessage, TaskPublisher,
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::commands::{DeleteReport, GenerateReport};
use crate::domain::validation;

/// Result of a successfully handled `GenerateReport` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReportResult {
    /// Identity of the newly recorded report.
    pub report_id: String,
    /// Identity of the dispatched task message.
    pub message_id: Uuid,
}

/// Builds the task message for a report: serialized params as payload,
/// namespace, report type and correlation id as metadata.
///
/// # Errors
///
/// Returns `ReportError::Publish` if the params cannot be serialized.
pub fn build_task_message(
    params: &ReportParams,
    namespace: &Namespace,
    correlation_id: Uuid,
    message_id: Uuid,
) -> Result<TaskMessage, ReportError> {
    let payload = serde_json::to_vec(params)
        .map_err(|e| ReportError::Publish(format!("task payload serialization failed: {e}")))?;

    Ok(TaskMessage::new(message_id, payload)
        .with_metadata(NAMESPACE_METADATA_KEY, namespace.as_str())
        .with_metadata(REPORT_TYPE_METADATA_KEY, params.report_type.as_str())
        .with_correlation_id(correlation_id))
}

/// Handles the `GenerateReport` command: validates, records the report in
/// `starting` status, then publishes the generation task to `topic`.
///
/// This is a creation command: the handler mints the `report_id`.
///
/// # Errors
///
/// Returns `ReportError::Validation` for a malformed request (nothing
/// written), `ReportError::Store` if the record cannot be created (nothing
/// published) and `ReportError::Publish` if the task cannot be dispatched.
/// In the last case the record stays in the ledger in `starting` status.
pub async fn handle_generate_report(
    command: &GenerateReport,
    ids: &dyn IdGenerator,
    ledger: &dyn ReportLedger,
    publisher: &dyn TaskPublisher,
    topic: &str,
) -> Result<GenerateReportResult, ReportError> {
    command.validate().inspect_err(|e| {
        warn!(
            command = command.command_type(),
            correlation_id = %command.correlation_id,
            error = %e,
            "rejected report request"
        );
    })?;

    let report_id = ids.report_id();

    let new_report = NewReport {
        report_id: report_id.clone(),
        report_type: command.report_type.clone(),
        status: ReportStatus::Starting,
        filters: command.filters.clone(),
        duration: command.duration.clone(),
    };

    ledger.create(&new_report).await.inspect_err(|e| {
        error!(
            namespace = %command.namespace,
            report_id = %report_id,
            correlation_id = %command.correlation_id,
            error = %e,
            "failed to record report"
        );
    })?;

    let params = ReportParams {
        report_id: report_id.clone(),
        report_type: command.report_type.clone(),
        duration: command.duration.clone(),
        filters: command.filters.clone(),
    };
    let message_id = ids.message_id();

    let dispatch = match build_task_message(
        &params,
        &command.namespace,
        command.correlation_id,
        message_id,
    ) {
        Ok(message) => publisher.publish(topic, &message).await,
        Err(e) => Err(e),
    };

    if let Err(e) = dispatch {
        // The record is already committed and is left in `starting`.
        error!(
            namespace = %command.namespace,
            report_id = %report_id,
            message_id = %message_id,
            correlation_id = %command.correlation_id,
            error = %e,
            "failed to dispatch report task; record left in starting status"
        );
        return Err(e);
    }

    info!(
        namespace = %command.namespace,
        report_id = %report_id,
        message_id = %message_id,
        correlation_id = %command.correlation_id,
        report_type = %command.report_type,
        "report task dispatched"
    );

    Ok(GenerateReportResult {
        report_id,
        message_id,
    })
}

/// Handles the `DeleteReport` command. Deleting an unknown report succeeds.
///
/// # Errors
///
/// Returns `ReportError::Validation` for a blank id and `ReportError::Store`
/// if the ledger fails.
pub async fn handle_delete_report(
    command: &DeleteReport,
    ledger: &dyn ReportLedger,
) -> Result<(), ReportError> {
    validation::validate_report_id(&command.report_id)?;

    ledger.delete(&command.report_id).await.inspect_err(|e| {
        error!(
            report_id = %command.report_id,
            correlation_id = %command.correlation_id,
            error = %e,
            "failed to delete report"
        );
    })?;

    info!(
        report_id = %command.report_id,
        correlation_id = %command.correlation_id,
        "report deleted"
    );
    Ok(())
}
