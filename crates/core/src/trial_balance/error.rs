//! Report error types.

use rust_decimal::Decimal;
use thiserror::Error;

use ledgertree_shared::AppError;
use ledgertree_shared::types::PaginationError;

/// Errors that abort a single trial balance request.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Start of the period is after its end.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start, epoch seconds.
        start: i64,
        /// End, epoch seconds.
        end: i64,
    },

    /// Timestamp outside the representable calendar range.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(i64),

    /// Rejected pagination parameters.
    #[error("Invalid pagination: {0}")]
    InvalidPage(#[from] PaginationError),

    /// Report configuration cannot be used.
    #[error("Invalid report configuration: {0}")]
    InvalidConfig(String),

    /// A storage collaborator failed.
    #[error("Data source error: {0}")]
    DataSource(String),

    /// Line item amounts too large to total exactly.
    #[error("Line item amounts exceed the representable range")]
    AmountOverflow,

    /// Ending balance differs from beginning plus midterm (strict policy only).
    #[error(
        "Reconciliation mismatch on account {code}: beginning {beginning} + midterm {midterm} != ending {ending}"
    )]
    ReconciliationMismatch {
        /// Account code.
        code: String,
        /// Beginning net (debit - credit).
        beginning: Decimal,
        /// Midterm net.
        midterm: Decimal,
        /// Ending net.
        ending: Decimal,
    },
}

impl ReportError {
    /// Create a data source error.
    #[must_use]
    pub fn data_source(msg: impl Into<String>) -> Self {
        Self::DataSource(msg.into())
    }

    /// Returns true for bad request parameters, rejected before any computation.
    #[must_use]
    pub const fn is_range_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDateRange { .. } | Self::InvalidTimestamp(_) | Self::InvalidPage(_)
        )
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        let message = err.to_string();
        match err {
            ReportError::InvalidDateRange { .. }
            | ReportError::InvalidTimestamp(_)
            | ReportError::InvalidPage(_) => Self::Validation(message),
            ReportError::DataSource(_) => Self::ExternalService(message),
            ReportError::InvalidConfig(_) => Self::Configuration(message),
            ReportError::AmountOverflow => Self::Validation(message),
            ReportError::ReconciliationMismatch { .. } => Self::Internal(message),
        }
    }
}
