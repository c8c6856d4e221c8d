//! Lockstep merge of the three stage forests into one report forest.
//!
//! Stage trees are matched by [`NodeKey`], never by position: a virtual
//! account can exist in one stage and not another, and each sibling group is
//! the union of the keys present in any stage.

use std::collections::BTreeMap;

use ledgertree_shared::ReconciliationPolicy;
use ledgertree_shared::types::AccountId;

use super::error::ReportError;
use super::hierarchy::{AccountHierarchy, NodeKey, StageForest, StageNode};
use super::types::{TrialBalanceNode, TrialBalanceSection};
use super::warning::{Diagnostics, ReportWarning};
use crate::ledger::{AccountBucket, DebitCredit};

type StageSlots<'f> = [Option<&'f StageNode>; 3];

/// Combines beginning, midterm and ending forests of one report.
#[derive(Debug, Clone, Copy)]
pub struct StageCombiner<'h> {
    hierarchy: &'h AccountHierarchy,
    virtual_label: &'h str,
    policy: ReconciliationPolicy,
}

impl<'h> StageCombiner<'h> {
    /// Creates a combiner naming virtual accounts `"{parent name} - {virtual_label}"`.
    #[must_use]
    pub const fn new(
        hierarchy: &'h AccountHierarchy,
        virtual_label: &'h str,
        policy: ReconciliationPolicy,
    ) -> Self {
        Self {
            hierarchy,
            virtual_label,
            policy,
        }
    }

    /// Builds the report forest from rolled-up stage forests.
    ///
    /// Every node is checked for `ending = beginning + midterm` on net amounts.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::ReconciliationMismatch`] on the first failing
    /// node under the strict policy. Under the warn policy mismatches are
    /// recorded in `diagnostics` instead.
    pub fn combine(
        &self,
        beginning: &StageForest,
        midterm: &StageForest,
        ending: &StageForest,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<TrialBalanceSection>, ReportError> {
        let mut buckets: BTreeMap<AccountBucket, [&[StageNode]; 3]> = BTreeMap::new();
        for (stage, forest) in [beginning, midterm, ending].into_iter().enumerate() {
            for section in &forest.sections {
                buckets.entry(section.bucket).or_default()[stage] = section.roots.as_slice();
            }
        }

        buckets
            .into_iter()
            .map(|(bucket, roots)| -> Result<_, ReportError> {
                Ok(TrialBalanceSection {
                    bucket,
                    accounts: self.combine_siblings(roots, diagnostics)?,
                })
            })
            .collect()
    }

    fn combine_siblings(
        &self,
        stages: [&[StageNode]; 3],
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<TrialBalanceNode>, ReportError> {
        let mut keyed: BTreeMap<NodeKey, StageSlots<'_>> = BTreeMap::new();
        for (stage, nodes) in stages.into_iter().enumerate() {
            for node in nodes {
                keyed.entry(node.key).or_default()[stage] = Some(node);
            }
        }

        keyed
            .into_iter()
            .map(|(key, slots)| self.combine_node(key, slots, diagnostics))
            .collect()
    }

    fn combine_node(
        &self,
        key: NodeKey,
        slots: StageSlots<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Result<TrialBalanceNode, ReportError> {
        let [beginning, midterm, ending] = slots.map(rollup_of);
        let children = self.combine_siblings(slots.map(children_of), diagnostics)?;
        let (account_id, code, name, bucket, is_virtual) = self.describe(key);

        if ending.net() != beginning.net() + midterm.net() {
            match self.policy {
                ReconciliationPolicy::Strict => {
                    return Err(ReportError::ReconciliationMismatch {
                        code,
                        beginning: beginning.net(),
                        midterm: midterm.net(),
                        ending: ending.net(),
                    });
                }
                ReconciliationPolicy::Warn => {
                    diagnostics.record(ReportWarning::ReconciliationMismatch {
                        code: code.clone(),
                        beginning: beginning.net(),
                        midterm: midterm.net(),
                        ending: ending.net(),
                    });
                }
            }
        }

        Ok(TrialBalanceNode {
            account_id,
            code,
            name,
            bucket,
            is_virtual,
            beginning,
            midterm,
            ending,
            children,
        })
    }

    fn describe(&self, key: NodeKey) -> (AccountId, String, String, AccountBucket, bool) {
        match key {
            NodeKey::Account(idx) => {
                let node = self.hierarchy.node(idx);
                (
                    node.account.id,
                    node.account.code.clone(),
                    node.account.name.clone(),
                    node.bucket,
                    false,
                )
            }
            NodeKey::Virtual(idx) => {
                let parent = self.hierarchy.node(idx);
                (
                    parent.account.id.virtual_child(),
                    self.hierarchy.virtual_code(idx),
                    format!("{} - {}", parent.account.name, self.virtual_label),
                    parent.bucket,
                    true,
                )
            }
        }
    }
}

fn rollup_of(slot: Option<&StageNode>) -> DebitCredit {
    slot.map_or(DebitCredit::ZERO, |node| node.rollup)
}

fn children_of(slot: Option<&StageNode>) -> &[StageNode] {
    slot.map(|node| node.children.as_slice()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Account;
    use crate::trial_balance::hierarchy::StageSection;
    use crate::trial_balance::inject;
    use crate::trial_balance::merge::StageSubtotals;
    use rust_decimal_macros::dec;
    use std::collections::BTreeSet;

    struct Fixture {
        hierarchy: AccountHierarchy,
        cash: Account,
        admin: Account,
    }

    fn fixture() -> Fixture {
        let cash = Account::new(AccountId::new(), "1101", "Cash", "asset");
        let admin = Account::new(AccountId::new(), "1101-1", "Cash/Admin", "asset");
        let hierarchy = AccountHierarchy::build(
            &[cash.clone(), admin.clone()],
            &BTreeSet::new(),
            &mut Diagnostics::new(),
        );
        Fixture {
            hierarchy,
            cash,
            admin,
        }
    }

    fn rolled(hierarchy: &AccountHierarchy, subtotals: &StageSubtotals) -> StageForest {
        let mut forest = hierarchy.stage_forest(subtotals);
        inject::apply(&mut forest);
        forest
    }

    #[test]
    fn test_virtual_account_present_in_one_stage_only() {
        let f = fixture();
        let before = StageSubtotals::from([(f.admin.id, DebitCredit::new(dec!(1), dec!(0)))]);
        let inside = StageSubtotals::from([
            (f.cash.id, DebitCredit::new(dec!(5), dec!(0))),
            (f.admin.id, DebitCredit::new(dec!(0), dec!(2))),
        ]);
        let through = StageSubtotals::from([
            (f.cash.id, DebitCredit::new(dec!(5), dec!(0))),
            (f.admin.id, DebitCredit::new(dec!(1), dec!(2))),
        ]);

        let mut diagnostics = Diagnostics::new();
        let sections = StageCombiner::new(&f.hierarchy, "Other", ReconciliationPolicy::Strict)
            .combine(
                &rolled(&f.hierarchy, &before),
                &rolled(&f.hierarchy, &inside),
                &rolled(&f.hierarchy, &through),
                &mut diagnostics,
            )
            .unwrap();

        let cash = &sections[0].accounts[0];
        assert_eq!(cash.code, "1101");
        assert_eq!(cash.beginning, DebitCredit::new(dec!(1), dec!(0)));
        assert_eq!(cash.ending, DebitCredit::new(dec!(6), dec!(2)));
        assert_eq!(cash.children.len(), 2);

        let other = &cash.children[1];
        assert!(other.is_virtual);
        assert_eq!(other.code, "1101-0");
        assert_eq!(other.name, "Cash - Other");
        assert_eq!(other.account_id, f.cash.id.virtual_child());
        assert_eq!(other.beginning, DebitCredit::ZERO);
        assert_eq!(other.midterm, DebitCredit::new(dec!(5), dec!(0)));
        assert!(diagnostics.warnings().is_empty());
    }

    fn mismatched(f: &Fixture) -> [StageForest; 3] {
        let one = StageSubtotals::from([(f.admin.id, DebitCredit::new(dec!(1), dec!(0)))]);
        let wrong = StageSubtotals::from([(f.admin.id, DebitCredit::new(dec!(3), dec!(0)))]);
        [
            rolled(&f.hierarchy, &one),
            rolled(&f.hierarchy, &one),
            rolled(&f.hierarchy, &wrong),
        ]
    }

    #[test]
    fn test_mismatch_fails_under_strict_policy() {
        let f = fixture();
        let [b, m, e] = mismatched(&f);
        let result = StageCombiner::new(&f.hierarchy, "Other", ReconciliationPolicy::Strict)
            .combine(&b, &m, &e, &mut Diagnostics::new());

        assert!(matches!(
            result,
            Err(ReportError::ReconciliationMismatch { ref code, .. }) if code == "1101-1"
        ));
    }

    #[test]
    fn test_mismatch_is_reported_under_warn_policy() {
        let f = fixture();
        let [b, m, e] = mismatched(&f);
        let mut diagnostics = Diagnostics::new();
        let sections = StageCombiner::new(&f.hierarchy, "Other", ReconciliationPolicy::Warn)
            .combine(&b, &m, &e, &mut diagnostics)
            .unwrap();

        assert_eq!(sections[0].accounts[0].ending, DebitCredit::new(dec!(3), dec!(0)));
        // Child first, then its parent.
        let codes: Vec<_> = diagnostics
            .warnings()
            .iter()
            .filter_map(|w| match w {
                ReportWarning::ReconciliationMismatch { code, .. } => Some(code.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(codes, vec!["1101-1", "1101"]);
    }

    #[test]
    fn test_sections_union_across_stages() {
        let f = fixture();
        let empty = StageForest { sections: Vec::new() };
        let full = rolled(&f.hierarchy, &StageSubtotals::new());
        let sections = StageCombiner::new(&f.hierarchy, "Other", ReconciliationPolicy::Strict)
            .combine(&empty, &empty, &full, &mut Diagnostics::new())
            .unwrap();

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].accounts[0].children[0].code, "1101-1");

        let orphan = StageForest {
            sections: vec![StageSection {
                bucket: AccountBucket::Uncategorized,
                roots: Vec::new(),
            }],
        };
        let sections = StageCombiner::new(&f.hierarchy, "Other", ReconciliationPolicy::Strict)
            .combine(&full, &orphan, &full, &mut Diagnostics::new())
            .unwrap();
        assert_eq!(sections.last().unwrap().bucket, AccountBucket::Uncategorized);
    }
}
