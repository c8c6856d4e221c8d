//! Per-account debit/credit subtotals of one stage.

use std::collections::BTreeMap;

use ledgertree_shared::types::AccountId;

use crate::ledger::{DebitCredit, LedgerLineItem};

/// Subtotals of one stage keyed by account.
pub type StageSubtotals = BTreeMap<AccountId, DebitCredit>;

/// Groups line items by account and sums each side.
///
/// Exact decimal sums; the input order has no effect on the result.
pub fn merge_stage<'a>(items: impl IntoIterator<Item = &'a LedgerLineItem>) -> StageSubtotals {
    let mut subtotals = StageSubtotals::new();
    for item in items {
        subtotals.entry(item.account_id).or_default().post(item);
    }
    subtotals
}

/// Sum of every subtotal in the stage.
pub fn stage_total(subtotals: &StageSubtotals) -> DebitCredit {
    subtotals.values().sum()
}
