//! Request-shape validation.
//!
//! All checks run before any side effect and fail with
//! `ReportError::Validation`.

use reportgen_core::error::ReportError;

/// Longest accepted report type tag.
pub const MAX_REPORT_TYPE_LEN: usize = 64;
/// Longest accepted duration expression.
pub const MAX_DURATION_LEN: usize = 32;
/// Longest accepted filter expression, in bytes.
pub const MAX_FILTERS_LEN: usize = 4096;
/// Longest accepted report id; matches the ledger key column.
pub const MAX_REPORT_ID_LEN: usize = 255;

/// Checks a report type tag: ASCII alphanumerics, `-` and `_`.
///
/// # Errors
///
/// Returns `ReportError::Validation` if the tag is empty, too long or has
/// other characters.
pub fn validate_report_type(report_type: &str) -> Result<(), ReportError> {
    if report_type.is_empty() {
        return Err(ReportError::Validation("report_type is required".into()));
    }
    if report_type.len() > MAX_REPORT_TYPE_LEN {
        return Err(ReportError::Validation(format!(
            "report_type exceeds {MAX_REPORT_TYPE_LEN} characters"
        )));
    }
    if !report_type
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ReportError::Validation(format!(
            "report_type `{report_type}` contains invalid characters"
        )));
    }
    Ok(())
}

/// Checks a duration expression. The value is opaque here; only its shape
/// is checked.
///
/// # Errors
///
/// Returns `ReportError::Validation` if the duration is blank, too long or
/// contains whitespace.
pub fn validate_duration(duration: &str) -> Result<(), ReportError> {
    if duration.is_empty() {
        return Err(ReportError::Validation("duration is required".into()));
    }
    if duration.len() > MAX_DURATION_LEN {
        return Err(ReportError::Validation(format!(
            "duration exceeds {MAX_DURATION_LEN} characters"
        )));
    }
    if duration.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ReportError::Validation(
            "duration must not contain whitespace".into(),
        ));
    }
    Ok(())
}

/// Checks a filter expression. Empty means "no filters".
///
/// # Errors
///
/// Returns `ReportError::Validation` if the expression is too long.
pub fn validate_filters(filters: &str) -> Result<(), ReportError> {
    if filters.len() > MAX_FILTERS_LEN {
        return Err(ReportError::Validation(format!(
            "filters exceed {MAX_FILTERS_LEN} bytes"
        )));
    }
    Ok(())
}

/// Checks a report id supplied for lookup or deletion.
///
/// # Errors
///
/// Returns `ReportError::Validation` if the id is blank or too long.
pub fn validate_report_id(report_id: &str) -> Result<(), ReportError> {
    if report_id.trim().is_empty() {
        return Err(ReportError::Validation("report_id is required".into()));
    }
    if report_id.len() > MAX_REPORT_ID_LEN {
        return Err(ReportError::Validation(format!(
            "report_id exceeds {MAX_REPORT_ID_LEN} characters"
        )));
    }
    Ok(())
}
