//! Multi-period trial balance rollup.
//!
//! Computes beginning, midterm and ending debit/credit totals per account,
//! rolled up along the account-code hierarchy:
//! - Stage partitioning of line items around the reporting period
//! - Per-account merge and hierarchy placement
//! - Virtual "other" sub-accounts for parents with direct postings
//! - Lockstep combine of the three stages with reconciliation checks
//! - Per-sibling sorting, row layout and pagination

pub mod combine;
pub mod engine;
pub mod error;
pub mod hierarchy;
pub mod inject;
pub mod merge;
pub mod partition;
pub mod service;
pub mod sort;
pub mod types;
pub mod warning;


pub use engine::{ReportInput, TrialBalanceEngine};
pub use error::ReportError;
pub use service::{LedgerSource, TrialBalanceService};
pub use sort::{SortDirection, SortField, SortOption};
pub use types::*;
pub use warning::{ReportWarning, WarningSeverity};
