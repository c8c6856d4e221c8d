//! Ledger line item domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ledgertree_shared::types::AccountId;

/// Type of ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Debit entry (increases assets/expenses, decreases liabilities/equity/revenue).
    Debit,
    /// Credit entry (decreases assets/expenses, increases liabilities/equity/revenue).
    Credit,
}

/// One side of a posted double-entry record.
///
/// Produced upstream by voucher posting and immutable once posted; the report
/// engine only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerLineItem {
    /// The account affected by this line.
    pub account_id: AccountId,
    /// Unsigned magnitude in the book's currency.
    pub amount: Decimal,
    /// Whether this is a debit or credit.
    pub entry_type: EntryType,
    /// Posting time in epoch seconds.
    pub posted_at: i64,
}

impl LedgerLineItem {
    /// Creates a debit line.
    #[must_use]
    pub const fn debit(account_id: AccountId, amount: Decimal, posted_at: i64) -> Self {
        Self {
            account_id,
            amount,
            entry_type: EntryType::Debit,
            posted_at,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub const fn credit(account_id: AccountId, amount: Decimal, posted_at: i64) -> Self {
        Self {
            account_id,
            amount,
            entry_type: EntryType::Credit,
            posted_at,
        }
    }

    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.entry_type {
            EntryType::Debit => self.amount,
            EntryType::Credit => -self.amount,
        }
    }
}
