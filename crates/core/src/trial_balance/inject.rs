//! Virtual "other" sub-accounts and bottom-up rollup.
//!
//! A parent that has children and also direct postings would otherwise show a
//! total that is not the sum of its visible rows. Its own amount is moved into
//! a synthetic child so every rendered parent equals the sum of its children.

use super::hierarchy::{NodeKey, StageForest, StageNode};
use crate::ledger::DebitCredit;

/// Injects virtual accounts and computes rollups for a whole stage forest.
///
/// Running it again on its own output changes nothing.
pub fn apply(forest: &mut StageForest) {
    for section in &mut forest.sections {
        for root in &mut section.roots {
            inject_virtual_accounts(root);
            roll_up(root);
        }
    }
}

/// Post-order: moves a parent's own amount into a synthetic child.
///
/// Only nodes with children and a non-zero own subtotal are touched; the own
/// subtotal is zero afterwards, which makes a second pass a no-op.
pub fn inject_virtual_accounts(node: &mut StageNode) {
    for child in &mut node.children {
        inject_virtual_accounts(child);
    }

    if node.children.is_empty() || node.own.is_zero() {
        return;
    }
    if let NodeKey::Account(idx) = node.key {
        let own = std::mem::replace(&mut node.own, DebitCredit::ZERO);
        node.children
            .push(StageNode::leaf(NodeKey::Virtual(idx), own));
    }
}

/// Sets `rollup = own + Σ children.rollup` bottom-up and returns the node's rollup.
pub fn roll_up(node: &mut StageNode) -> DebitCredit {
    let children: DebitCredit = node.children.iter_mut().map(roll_up).sum();
    node.rollup = node.own + children;
    node.rollup
}
