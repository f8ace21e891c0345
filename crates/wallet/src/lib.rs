//! Wallet domain module: immutable balance-ledger entries.
//!
//! A user's balance is mutated exclusively through the transaction component
//! in `vendora-infra`; this crate holds the records it produces.

pub mod transaction;

pub use transaction::{TransactionKind, TransactionRecord, TransactionSource};
