//! Core business logic module
//!
//! This module contains the ledger computation components:
//! - `aggregator` - Expense validation and per-member balance computation
//! - `planner` - Minimal settlement planning over balances
//! - `split` - Equal-split construction with exact minor-unit distribution
//! - `async` - Concurrent batch aggregation

pub mod aggregator;
pub mod r#async;
pub mod planner;
pub mod split;

pub use aggregator::BalanceAggregator;
pub use planner::SettlementPlanner;
pub use r#async::{BalanceAccumulator, BatchAggregator};
pub use split::equal_split;

use crate::types::{Balances, Expense, Group, LedgerError, SettlementPlan};

/// Compute every member's balance using the default tolerance
///
/// Shorthand for [`BalanceAggregator::compute_balances`] with
/// [`LedgerConfig::default`](crate::config::LedgerConfig::default).
pub fn compute_balances(group: &Group, expenses: &[Expense]) -> Result<Balances, LedgerError> {
    BalanceAggregator::default().compute_balances(group, expenses)
}

/// Plan a settlement using the default tolerance
///
/// Shorthand for [`SettlementPlanner::plan_settlement`] with
/// [`LedgerConfig::default`](crate::config::LedgerConfig::default).
pub fn plan_settlement(balances: &Balances) -> Result<SettlementPlan, LedgerError> {
    SettlementPlanner::default().plan_settlement(balances)
}
