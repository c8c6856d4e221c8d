//! Account hierarchy over the chart of accounts and per-stage account forests.
//!
//! The hierarchy is an arena: nodes live in one `Vec` and refer to each other
//! by index. Parents are found through a code index, one hash lookup per
//! code segment, so building is `O(m log m)` for `m` accounts.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use ledgertree_shared::types::AccountId;

use super::merge::StageSubtotals;
use super::warning::{Diagnostics, ReportWarning};
use crate::ledger::account::{is_descendant_code, parent_code_candidates};
use crate::ledger::{Account, AccountBucket, CODE_SEPARATOR, DebitCredit, compare_codes};

/// One account in the hierarchy arena.
#[derive(Debug, Clone)]
pub struct HierarchyNode {
    /// The account (a placeholder for unknown ids).
    pub account: Account,
    /// Section this account is filed under when it is a root.
    pub bucket: AccountBucket,
    /// Index of the parent node.
    pub parent: Option<usize>,
    /// Indices of the child nodes.
    pub children: Vec<usize>,
    /// Stands in for an account id that line items reference but storage does not know.
    pub is_placeholder: bool,
}

/// Parent/child structure of one report's accounts.
#[derive(Debug, Clone)]
pub struct AccountHierarchy {
    nodes: Vec<HierarchyNode>,
    by_code: HashMap<String, usize>,
    by_id: HashMap<AccountId, usize>,
    sections: Vec<(AccountBucket, Vec<usize>)>,
}

/// Identity of a node in a stage forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKey {
    /// A hierarchy node, by arena index.
    Account(usize),
    /// The synthetic "other" child of the hierarchy node at this index.
    Virtual(usize),
}

/// An account and its subtotals within one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageNode {
    /// Node identity.
    pub key: NodeKey,
    /// Amounts posted directly to this account.
    pub own: DebitCredit,
    /// Own plus all descendants; zero until rolled up.
    pub rollup: DebitCredit,
    /// Child nodes.
    pub children: Vec<StageNode>,
}

impl StageNode {
    /// A childless node holding `own`.
    #[must_use]
    pub const fn leaf(key: NodeKey, own: DebitCredit) -> Self {
        Self {
            key,
            own,
            rollup: DebitCredit::ZERO,
            children: Vec::new(),
        }
    }
}

/// Root accounts of one type section within one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSection {
    /// Section.
    pub bucket: AccountBucket,
    /// Top-level accounts.
    pub roots: Vec<StageNode>,
}

/// The account forest of one stage, one tree list per type section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageForest {
    /// Sections in report order.
    pub sections: Vec<StageSection>,
}

impl AccountHierarchy {
    /// Builds the hierarchy.
    ///
    /// Accounts are processed shallow-first (code length, then code), so every
    /// possible parent is indexed before its children. A code's parent is the
    /// longest proper `-`-prefix that exists. Accounts without a parent become
    /// roots of their type section; unrecognized types are logged and filed
    /// under `Uncategorized`. Each id in `unknown_ids` gets a placeholder root
    /// in `Uncategorized`.
    pub fn build(
        accounts: &[Account],
        unknown_ids: &BTreeSet<AccountId>,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let mut ordered: Vec<&Account> = accounts.iter().collect();
        ordered.sort_by(|a, b| compare_codes(&a.code, &b.code).then_with(|| a.id.cmp(&b.id)));

        let mut hierarchy = Self {
            nodes: Vec::with_capacity(ordered.len() + unknown_ids.len()),
            by_code: HashMap::with_capacity(ordered.len()),
            by_id: HashMap::with_capacity(ordered.len() + unknown_ids.len()),
            sections: Vec::new(),
        };
        let mut roots: BTreeMap<AccountBucket, Vec<usize>> = BTreeMap::new();

        for account in ordered {
            let bucket = match account.parsed_type() {
                Ok(account_type) => AccountBucket::Category(account_type),
                Err(raw) => {
                    diagnostics.record(ReportWarning::UncategorizedAccount {
                        account_id: account.id,
                        code: account.code.clone(),
                        account_type: raw,
                    });
                    AccountBucket::Uncategorized
                }
            };

            let parent = parent_code_candidates(&account.code)
                .find_map(|candidate| hierarchy.by_code.get(candidate).copied());

            let idx = hierarchy.nodes.len();
            hierarchy.nodes.push(HierarchyNode {
                account: account.clone(),
                bucket,
                parent,
                children: Vec::new(),
                is_placeholder: false,
            });

            if hierarchy.by_code.contains_key(&account.code) {
                diagnostics.record(ReportWarning::DuplicateAccountCode {
                    account_id: account.id,
                    code: account.code.clone(),
                });
            } else {
                hierarchy.by_code.insert(account.code.clone(), idx);
            }
            hierarchy.by_id.entry(account.id).or_insert(idx);

            match parent {
                Some(parent) => hierarchy.nodes[parent].children.push(idx),
                None => roots.entry(bucket).or_default().push(idx),
            }
        }

        for &account_id in unknown_ids {
            let idx = hierarchy.nodes.len();
            hierarchy.nodes.push(HierarchyNode {
                account: Account::new(
                    account_id,
                    account_id.to_string(),
                    format!("Unknown account {account_id}"),
                    String::new(),
                ),
                bucket: AccountBucket::Uncategorized,
                parent: None,
                children: Vec::new(),
                is_placeholder: true,
            });
            hierarchy.by_id.entry(account_id).or_insert(idx);
            roots
                .entry(AccountBucket::Uncategorized)
                .or_default()
                .push(idx);
        }

        hierarchy.sections = roots.into_iter().collect();

        tracing::debug!(
            accounts = hierarchy.nodes.len(),
            sections = hierarchy.sections.len(),
            "built account hierarchy"
        );

        hierarchy
    }

    /// Number of nodes, placeholders included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if there are no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` did not come from this hierarchy.
    #[must_use]
    pub fn node(&self, idx: usize) -> &HierarchyNode {
        &self.nodes[idx]
    }

    /// Arena index of the node line items for `account_id` are posted to.
    #[must_use]
    pub fn index_of(&self, account_id: AccountId) -> Option<usize> {
        self.by_id.get(&account_id).copied()
    }

    /// Arena index of the account with `code`.
    #[must_use]
    pub fn index_of_code(&self, code: &str) -> Option<usize> {
        self.by_code.get(code).copied()
    }

    /// Root indices per type section, in report order.
    #[must_use]
    pub fn sections(&self) -> &[(AccountBucket, Vec<usize>)] {
        &self.sections
    }

    /// Code for the synthetic "other" child of the node at `idx`.
    ///
    /// `${code}-0`, or `-00`, `-000`, ... when a real account already holds
    /// that code or sits below it.
    #[must_use]
    pub fn virtual_code(&self, idx: usize) -> String {
        let base = &self.nodes[idx].account.code;
        let mut suffix = String::from("0");
        loop {
            let candidate = format!("{base}{CODE_SEPARATOR}{suffix}");
            if !self.is_code_taken(&candidate) {
                return candidate;
            }
            suffix.push('0');
        }
    }

    fn is_code_taken(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
            || self.by_code.keys().any(|real| is_descendant_code(code, real))
    }

    /// Builds one stage's forest with each node holding only its own subtotal.
    #[must_use]
    pub fn stage_forest(&self, subtotals: &StageSubtotals) -> StageForest {
        let sections = self
            .sections
            .iter()
            .map(|(bucket, roots)| StageSection {
                bucket: *bucket,
                roots: roots
                    .iter()
                    .map(|&idx| self.stage_node(idx, subtotals))
                    .collect(),
            })
            .collect();
        StageForest { sections }
    }

    fn stage_node(&self, idx: usize, subtotals: &StageSubtotals) -> StageNode {
        let node = &self.nodes[idx];
        // Duplicate ids: amounts go to the first node only.
        let own = if self.index_of(node.account.id) == Some(idx) {
            subtotals.get(&node.account.id).copied().unwrap_or_default()
        } else {
            DebitCredit::ZERO
        };

        StageNode {
            key: NodeKey::Account(idx),
            own,
            rollup: DebitCredit::ZERO,
            children: node
                .children
                .iter()
                .map(|&child| self.stage_node(child, subtotals))
                .collect(),
        }
    }
}
