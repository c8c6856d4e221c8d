//! Trial balance data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgertree_shared::types::{AccountId, CurrencyCode, PageRequest, PageResponse};

use super::sort::SortOption;
use super::warning::ReportWarning;
use crate::ledger::{AccountBucket, DebitCredit};
use crate::period::{PeriodRequest, ReportPeriod};

/// An account with its rolled-up amounts for all three stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialBalanceNode {
    /// Account ID (derived for virtual accounts).
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Type section of the tree this node belongs to.
    pub bucket: AccountBucket,
    /// Synthetic "other" sub-account holding the parent's direct postings.
    pub is_virtual: bool,
    /// Before the period.
    pub beginning: DebitCredit,
    /// Inside the period.
    pub midterm: DebitCredit,
    /// Beginning plus midterm.
    pub ending: DebitCredit,
    /// Sub-accounts.
    pub children: Vec<TrialBalanceNode>,
}

impl TrialBalanceNode {
    /// Number of nodes in this subtree, itself included.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Self::subtree_len).sum::<usize>()
    }
}

/// Top-level accounts of one type section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialBalanceSection {
    /// Section.
    pub bucket: AccountBucket,
    /// Top-level accounts with their sub-account trees.
    pub accounts: Vec<TrialBalanceNode>,
}

/// How the forest is turned into pageable rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowLayout {
    /// One row per top-level account, sub-accounts nested inside it.
    #[default]
    Nested,
    /// One row per account in depth-first order, no nesting.
    Flat,
}

/// One self-contained row of the report payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalanceRow {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Type section ("asset", ..., "uncategorized").
    pub account_type: String,
    /// Synthetic "other" sub-account.
    pub is_virtual: bool,
    /// Nesting depth, 0 for top-level accounts.
    pub depth: usize,
    /// Beginning debit.
    pub beginning_debit: Decimal,
    /// Beginning credit.
    pub beginning_credit: Decimal,
    /// Midterm debit.
    pub midterm_debit: Decimal,
    /// Midterm credit.
    pub midterm_credit: Decimal,
    /// Ending debit.
    pub ending_debit: Decimal,
    /// Ending credit.
    pub ending_credit: Decimal,
    /// Nested sub-accounts (empty in the flat layout).
    pub sub_accounts: Vec<TrialBalanceRow>,
}

impl TrialBalanceRow {
    /// Row for `node` alone.
    #[must_use]
    pub fn from_node(node: &TrialBalanceNode, depth: usize) -> Self {
        Self {
            account_id: node.account_id,
            code: node.code.clone(),
            name: node.name.clone(),
            account_type: node.bucket.as_str().to_string(),
            is_virtual: node.is_virtual,
            depth,
            beginning_debit: node.beginning.debit,
            beginning_credit: node.beginning.credit,
            midterm_debit: node.midterm.debit,
            midterm_credit: node.midterm.credit,
            ending_debit: node.ending.debit,
            ending_credit: node.ending.credit,
            sub_accounts: Vec::new(),
        }
    }

    /// Row for `node` with its whole subtree nested in `sub_accounts`.
    #[must_use]
    pub fn nested(node: &TrialBalanceNode, depth: usize) -> Self {
        let mut row = Self::from_node(node, depth);
        row.sub_accounts = node
            .children
            .iter()
            .map(|child| Self::nested(child, depth + 1))
            .collect();
        row
    }
}

/// Report-wide totals over every account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTotals {
    /// Beginning totals.
    pub beginning: DebitCredit,
    /// Midterm totals.
    pub midterm: DebitCredit,
    /// Ending totals.
    pub ending: DebitCredit,
    /// Whether debits equal credits in every stage.
    pub is_balanced: bool,
}

impl ReportTotals {
    /// Sums the top-level accounts of every section.
    #[must_use]
    pub fn from_sections(sections: &[TrialBalanceSection]) -> Self {
        let roots = || sections.iter().flat_map(|section| section.accounts.iter());
        let beginning: DebitCredit = roots().map(|node| node.beginning).sum();
        let midterm: DebitCredit = roots().map(|node| node.midterm).sum();
        let ending: DebitCredit = roots().map(|node| node.ending).sum();

        Self {
            beginning,
            midterm,
            ending,
            is_balanced: beginning.is_balanced()
                && midterm.is_balanced()
                && ending.is_balanced(),
        }
    }
}

/// Report metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportNote {
    /// Currency every amount is expressed in.
    pub currency: CurrencyCode,
    /// Report-wide totals.
    pub total: ReportTotals,
}

/// The paginated report payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalancePage {
    /// Rows and pagination metadata.
    #[serde(flatten)]
    pub page: PageResponse<TrialBalanceRow>,
    /// Currency and totals.
    pub note: ReportNote,
    /// Effective reporting bounds.
    pub period: ReportPeriod,
}

/// Payload plus the warnings collected while building it.
#[derive(Debug, Clone, Serialize)]
pub struct TrialBalanceOutcome {
    /// The report.
    pub report: TrialBalancePage,
    /// Non-fatal input problems.
    pub warnings: Vec<ReportWarning>,
}

/// Parameters of one trial balance request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrialBalanceRequest {
    /// Reporting bounds; missing bounds use the default filing window.
    #[serde(flatten)]
    pub period: PeriodRequest,
    /// Sibling ordering.
    pub sort: SortOption,
    /// Page to return.
    #[serde(flatten)]
    pub page: PageRequest,
    /// Row layout.
    pub layout: RowLayout,
}
