//! Chart of accounts entries and account classification.

use serde::{Deserialize, Serialize};
use ledgertree_shared::types::AccountId;

/// Separator between code segments ("1101-1-2").
pub const CODE_SEPARATOR: char = '-';

/// A chart of accounts entry as supplied by storage.
///
/// Parent/child relationships are not stored; they are derived from code
/// prefixes when a report is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// The account ID.
    pub id: AccountId,
    /// Hierarchical code, `-`-delimited segments.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Raw type string from storage (e.g. "asset", "liability").
    pub account_type: String,
}

impl Account {
    /// Creates a new account.
    #[must_use]
    pub fn new(
        id: AccountId,
        code: impl Into<String>,
        name: impl Into<String>,
        account_type: impl Into<String>,
    ) -> Self {
        Self {
            id,
            code: code.into(),
            name: name.into(),
            account_type: account_type.into(),
        }
    }

    /// Parses the raw type string.
    ///
    /// # Errors
    ///
    /// Returns the unrecognized string.
    pub fn parsed_type(&self) -> Result<AccountType, String> {
        self.account_type.parse()
    }
}

/// Account classification.
///
/// Declaration order is the order type sections appear in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Resources owned.
    Asset,
    /// Obligations owed.
    Liability,
    /// Accounts that may carry either a debit or credit balance (clearing, derivatives).
    Common,
    /// Owners' equity.
    Equity,
    /// Production and service costs.
    Cost,
    /// Operating revenue.
    Revenue,
    /// Operating expenses.
    Expense,
    /// Non-operating income.
    OtherIncome,
    /// Non-operating expenses and losses.
    OtherExpense,
}

impl AccountType {
    /// Every type in report order.
    pub const ALL: [Self; 9] = [
        Self::Asset,
        Self::Liability,
        Self::Common,
        Self::Equity,
        Self::Cost,
        Self::Revenue,
        Self::Expense,
        Self::OtherIncome,
        Self::OtherExpense,
    ];

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Common => "common",
            Self::Equity => "equity",
            Self::Cost => "cost",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
            Self::OtherIncome => "other_income",
            Self::OtherExpense => "other_expense",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "asset" | "assets" => Ok(Self::Asset),
            "liability" | "liabilities" => Ok(Self::Liability),
            "common" => Ok(Self::Common),
            "equity" | "owners_equity" => Ok(Self::Equity),
            "cost" | "costs" => Ok(Self::Cost),
            "revenue" | "income" => Ok(Self::Revenue),
            "expense" | "expenses" => Ok(Self::Expense),
            "other_income" | "non_operating_income" => Ok(Self::OtherIncome),
            "other_expense" | "non_operating_expense" => Ok(Self::OtherExpense),
            _ => Err(s.to_string()),
        }
    }
}

/// Top-level report section an account tree is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccountBucket {
    /// A recognized account type.
    Category(AccountType),
    /// Accounts with an unrecognized type and placeholders for unknown account ids.
    Uncategorized,
}

impl AccountBucket {
    /// Classifies an account, falling back to `Uncategorized`.
    #[must_use]
    pub fn of(account: &Account) -> Self {
        account
            .parsed_type()
            .map_or(Self::Uncategorized, Self::Category)
    }

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Category(account_type) => account_type.as_str(),
            Self::Uncategorized => "uncategorized",
        }
    }
}

impl std::fmt::Display for AccountBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Candidate parent codes of `code`, longest first.
///
/// `"1101-1-2"` yields `"1101-1"` then `"1101"`.
pub fn parent_code_candidates(code: &str) -> impl Iterator<Item = &str> {
    let mut rest = code;
    std::iter::from_fn(move || {
        let cut = rest.rfind(CODE_SEPARATOR)?;
        rest = &rest[..cut];
        Some(rest)
    })
    .filter(|candidate| !candidate.is_empty())
}

/// Orders account codes shorter first, then lexicographically.
///
/// Sibling codes that differ only in a numeric segment compare numerically:
/// `"1101-2"` comes before `"1101-10"`.
#[must_use]
pub fn compare_codes(a: &str, b: &str) -> std::cmp::Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Returns true if `child` sits somewhere below `parent` in the code hierarchy.
#[must_use]
pub fn is_descendant_code(parent: &str, child: &str) -> bool {
    child.len() > parent.len() + 1
        && child.starts_with(parent)
        && child[parent.len()..].starts_with(CODE_SEPARATOR)
}
