//! Non-fatal input problems reported next to the payload.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use ledgertree_shared::types::AccountId;

/// How loudly a warning is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningSeverity {
    /// Bad input row; the report is still complete.
    Warning,
    /// The report may be wrong (upstream double-entry violation).
    High,
}

/// A problem found while building a report that did not stop it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportWarning {
    /// Account type string was not recognized; filed under "uncategorized".
    #[error("account {code} has unrecognized type '{account_type}'")]
    UncategorizedAccount {
        /// The account ID.
        account_id: AccountId,
        /// Account code.
        code: String,
        /// Raw type string.
        account_type: String,
    },

    /// Two accounts share a code; only the first takes part in prefix lookups.
    #[error("duplicate account code {code} on account {account_id}")]
    DuplicateAccountCode {
        /// The later account.
        account_id: AccountId,
        /// Shared code.
        code: String,
    },

    /// Line items reference an account missing from the chart of accounts.
    #[error("{line_items} line item(s) reference unknown account {account_id}")]
    UnknownAccount {
        /// Referenced ID.
        account_id: AccountId,
        /// Number of affected line items.
        line_items: usize,
    },

    /// Line items carry a negative amount; they are summed as-is.
    #[error("{line_items} line item(s) on account {account_id} have a negative amount")]
    NegativeAmount {
        /// The account ID.
        account_id: AccountId,
        /// Number of affected line items.
        line_items: usize,
    },

    /// Line items posted after the period end were returned by storage and left out.
    #[error("{line_items} line item(s) on account {account_id} are posted after the period end")]
    PostedAfterPeriod {
        /// The account ID.
        account_id: AccountId,
        /// Number of affected line items.
        line_items: usize,
    },

    /// Ending balance differs from beginning plus midterm.
    #[error(
        "account {code}: beginning {beginning} + midterm {midterm} != ending {ending}"
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

impl ReportWarning {
    /// Returns the log severity of this warning.
    #[must_use]
    pub const fn severity(&self) -> WarningSeverity {
        match self {
            Self::ReconciliationMismatch { .. } => WarningSeverity::High,
            _ => WarningSeverity::Warning,
        }
    }
}

/// Collects warnings for one report, logging each as it is recorded.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<ReportWarning>,
}

impl Diagnostics {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs and stores a warning.
    pub fn record(&mut self, warning: ReportWarning) {
        match warning.severity() {
            WarningSeverity::High => {
                tracing::warn!(severity = "high", "{warning}");
            }
            WarningSeverity::Warning => tracing::warn!("{warning}"),
        }
        self.warnings.push(warning);
    }

    /// Recorded warnings so far.
    #[must_use]
    pub fn warnings(&self) -> &[ReportWarning] {
        &self.warnings
    }

    /// Consumes the collector.
    #[must_use]
    pub fn into_warnings(self) -> Vec<ReportWarning> {
        self.warnings
    }
}
