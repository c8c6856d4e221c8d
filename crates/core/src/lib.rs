//! Core reporting logic for Ledgertree.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Ledger data is read through the [`trial_balance::LedgerSource`] trait.
//!
//! # Modules
//!
//! - `ledger` - Accounts, line items and debit/credit arithmetic
//! - `period` - Reporting period resolution
//! - `trial_balance` - Multi-period trial balance rollup

pub mod ledger;
pub mod period;
pub mod trial_balance;
