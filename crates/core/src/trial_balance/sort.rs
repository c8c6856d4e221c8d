//! Sibling ordering and row layout.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::types::{RowLayout, TrialBalanceNode, TrialBalanceRow, TrialBalanceSection};
use crate::ledger::compare_codes;

/// Column a report can be sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    /// Account code.
    #[default]
    Code,
    /// Account name.
    Name,
    /// Beginning debit.
    BeginningDebit,
    /// Beginning credit.
    BeginningCredit,
    /// Beginning net (debit - credit).
    BeginningAmount,
    /// Midterm debit.
    MidtermDebit,
    /// Midterm credit.
    MidtermCredit,
    /// Midterm net.
    MidtermAmount,
    /// Ending debit.
    EndingDebit,
    /// Ending credit.
    EndingCredit,
    /// Ending net.
    EndingAmount,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

/// Field and direction applied to every sibling group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortOption {
    /// Sort key.
    pub field: SortField,
    /// Direction of the key comparison.
    pub direction: SortDirection,
}

impl SortOption {
    /// Creates a sort option.
    #[must_use]
    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Compares two siblings; ties fall back to ascending code.
    ///
    /// Codes compare shorter first, then lexicographically.
    #[must_use]
    pub fn compare(&self, a: &TrialBalanceNode, b: &TrialBalanceNode) -> Ordering {
        let primary = match self.field {
            SortField::Code => compare_codes(&a.code, &b.code),
            SortField::Name => a.name.cmp(&b.name),
            SortField::BeginningDebit => a.beginning.debit.cmp(&b.beginning.debit),
            SortField::BeginningCredit => a.beginning.credit.cmp(&b.beginning.credit),
            SortField::BeginningAmount => a.beginning.net().cmp(&b.beginning.net()),
            SortField::MidtermDebit => a.midterm.debit.cmp(&b.midterm.debit),
            SortField::MidtermCredit => a.midterm.credit.cmp(&b.midterm.credit),
            SortField::MidtermAmount => a.midterm.net().cmp(&b.midterm.net()),
            SortField::EndingDebit => a.ending.debit.cmp(&b.ending.debit),
            SortField::EndingCredit => a.ending.credit.cmp(&b.ending.credit),
            SortField::EndingAmount => a.ending.net().cmp(&b.ending.net()),
        };
        let primary = match self.direction {
            SortDirection::Asc => primary,
            SortDirection::Desc => primary.reverse(),
        };
        primary.then_with(|| compare_codes(&a.code, &b.code))
    }
}

/// Sorts every sibling group of every section.
///
/// Parent/child links are never changed. Top-level accounts of different
/// sections are ordered against each other by [`layout_rows`].
pub fn sort_sections(sections: &mut [TrialBalanceSection], option: &SortOption) {
    for section in sections {
        sort_siblings(&mut section.accounts, option);
    }
}

/// Stable sort of one sibling group, then recursively of each child group.
pub fn sort_siblings(nodes: &mut [TrialBalanceNode], option: &SortOption) {
    nodes.sort_by(|a, b| option.compare(a, b));
    for node in nodes {
        sort_siblings(&mut node.children, option);
    }
}

/// Turns sorted sections into pageable rows.
///
/// The top-level accounts of all sections form one sibling group and are
/// ordered with `option`, so a page holds the highest-ranked accounts
/// whatever their type.
#[must_use]
pub fn layout_rows(
    sections: &[TrialBalanceSection],
    option: &SortOption,
    layout: RowLayout,
) -> Vec<TrialBalanceRow> {
    let mut roots: Vec<&TrialBalanceNode> = sections
        .iter()
        .flat_map(|section| section.accounts.iter())
        .collect();
    roots.sort_by(|a, b| option.compare(a, b));

    match layout {
        RowLayout::Nested => roots.into_iter().map(|node| TrialBalanceRow::nested(node, 0)).collect(),
        RowLayout::Flat => {
            let mut rows = Vec::new();
            for node in roots {
                push_preorder(node, 0, &mut rows);
            }
            rows
        }
    }
}

fn push_preorder(node: &TrialBalanceNode, depth: usize, rows: &mut Vec<TrialBalanceRow>) {
    rows.push(TrialBalanceRow::from_node(node, depth));
    for child in &node.children {
        push_preorder(child, depth + 1, rows);
    }
}
