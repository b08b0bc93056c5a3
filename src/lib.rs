//! Vaquita Ledger Library
//! # Overview
//!
//! This library computes, for a closed group of members sharing expenses, what
//! each member has paid, what each owes, and a short list of transfers that
//! settles every balance. Expense logs are read from CSV with either a sync or
//! an async strategy.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Group, Expense, Balance, Transfer, etc.)
//! - [`config`] - Numeric policy: rounding tolerance and share scale
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::aggregator`] - Expense validation and balance aggregation
//!   - [`core::planner`] - Settlement planning
//!   - [`core::split`] - Exact equal splits
//! - [`io`] - CSV readers and report writers
//! - [`strategy`] - Sync and async processing pipelines
//! - [`telemetry`] - Logging setup
//!
//! # Balances
//!
//! For every member:
//! - `paid`: Sum of amounts of the expenses they paid
//! - `owed`: Sum of their shares across all expenses
//! - `net`: `paid - owed`; positive means the member is owed money
//!
//! Nets always sum to zero across the group.
//!
//! # Example
//!
//! ```
//! use rust_decimal::Decimal;
//! use vaquita_ledger::{compute_balances, plan_settlement, Expense, Group, MemberId};
//!
//! let group = Group::new(["A", "B", "C"]).unwrap();
//! let expense = Expense::equal(1, "A", Decimal::from(90), group.members().cloned(), 2).unwrap();
//!
//! let balances = compute_balances(&group, &[expense]).unwrap();
//! assert_eq!(balances.net(&MemberId::from("A")), Some(Decimal::from(60)));
//!
//! let plan = plan_settlement(&balances).unwrap();
//! assert_eq!(plan.len(), 2);
//! ```

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod strategy;
pub mod telemetry;
pub mod types;

pub use config::LedgerConfig;
pub use core::{compute_balances, equal_split, plan_settlement, BalanceAggregator, SettlementPlanner};
pub use io::{write_balances_csv, write_transfers_csv};
pub use types::{
    Balance, Balances, Expense, ExpenseId, Group, LedgerError, MemberId, SettlementPlan, Split,
    Transfer,
};
