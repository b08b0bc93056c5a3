//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `member`: Member identifiers and groups
//! - `expense`: Expense records and splits
//! - `balance`: Derived per-member balances
//! - `transfer`: Transfers and settlement plans
//! - `error`: Error types for the ledger

pub mod balance;
pub mod error;
pub mod expense;
pub mod member;
pub mod transfer;

pub use balance::{Balance, Balances};
pub use error::LedgerError;
pub use expense::{Expense, ExpenseId, Split};
pub use member::{Group, MemberId};
pub use transfer::{SettlementPlan, Transfer};
