//! Validation error types.

use thiserror::Error;

use crate::validator::ValidationReport;

/// Declared parameters disagree with the SQL text or with each other.
///
/// The message is the full multi-line report, one line per category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{report}")]
pub struct ValidationError {
    report: ValidationReport,
}

impl ValidationError {
    /// Wrap a non-empty report.
    #[must_use]
    pub fn new(report: ValidationReport) -> Self {
        Self { report }
    }

    /// The report that caused this error.
    #[must_use]
    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    /// Consume the error, returning its report.
    #[must_use]
    pub fn into_report(self) -> ValidationReport {
        self.report
    }
}
