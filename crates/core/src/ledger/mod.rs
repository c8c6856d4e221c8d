//! Ledger data the report engine reads.
//!
//! - Chart of accounts entries and their classification
//! - Posted line items (one side of a double-entry record)
//! - Debit/credit pairs with exact decimal arithmetic

pub mod account;
pub mod balance;
pub mod entry;

pub use account::{Account, AccountBucket, AccountType, CODE_SEPARATOR, compare_codes};
pub use balance::DebitCredit;
pub use entry::{EntryType, LedgerLineItem};
