//! Ledger aggregation
//!
//! This module provides the `BalanceAggregator`, which turns an unordered
//! collection of expenses for a group into one balance per member.
//!
//! Every expense credits its payer by the full amount and debits each
//! participant by its share. Decimal arithmetic is exact, so the order in
//! which expenses are applied never changes the result.
//!
//! Before an expense is applied it is validated against the group and
//! normalized: a split accepted within tolerance has its rounding residual
//! folded into the largest share, so that every applied split sums exactly
//! to its amount and the resulting balances sum exactly to zero.

use crate::config::LedgerConfig;
use crate::types::{Balance, Balances, Expense, Group, LedgerError, MemberId, Split};
use rust_decimal::Decimal;
use std::borrow::Borrow;
use std::cmp::Reverse;
use std::collections::HashSet;

/// Computes per-member balances from expense records
///
/// Stateless apart from its configuration; safe to share between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceAggregator {
    config: LedgerConfig,
}

impl BalanceAggregator {
    /// Create an aggregator with the given numeric policy
    pub fn new(config: LedgerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Compute the balance of every group member
    ///
    /// # Arguments
    ///
    /// * `group` - The closed set of members
    /// * `expenses` - The group's expenses, in any order
    ///
    /// # Returns
    ///
    /// One balance per group member, including members with no activity.
    /// The nets of the returned balances sum exactly to zero.
    ///
    /// # Errors
    ///
    /// Returns the first error found, in input order:
    /// - `DuplicateExpense` if two expenses share an id
    /// - Any validation error from [`BalanceAggregator::validate`]
    /// - `ArithmeticOverflow` if a balance overflows
    ///
    /// No balances are returned on error.
    pub fn compute_balances(
        &self,
        group: &Group,
        expenses: &[Expense],
    ) -> Result<Balances, LedgerError> {
        self.aggregate(group, expenses.iter().map(Ok))
    }

    /// Compute balances from a fallible stream of expenses
    ///
    /// Same as [`BalanceAggregator::compute_balances`], but consumes the
    /// expenses one at a time, so that a read error and a validation error
    /// are reported in the order they occur in the input.
    pub fn aggregate<I, E>(&self, group: &Group, expenses: I) -> Result<Balances, LedgerError>
    where
        I: IntoIterator<Item = Result<E, LedgerError>>,
        E: Borrow<Expense>,
    {
        let mut balances = zero_balances(group);
        let mut seen = HashSet::new();

        for expense in expenses {
            let expense = expense?;
            let expense: &Expense = expense.borrow();

            if !seen.insert(expense.id) {
                return Err(LedgerError::DuplicateExpense {
                    expense: expense.id,
                });
            }

            let split = self.validate(group, expense)?;
            apply_expense(&mut balances, &expense.payer, expense.amount, &split)?;
        }

        tracing::debug!(
            members = group.len(),
            expenses = seen.len(),
            "computed balances"
        );

        Ok(balances)
    }

    /// Validate an expense against a group and return its normalized split
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount is zero or negative (`NonPositiveAmount`)
    /// - The split has no participants (`EmptySplit`)
    /// - The payer or a participant is not in the group (`UnknownMember`)
    /// - A share is negative (`NegativeShare`)
    /// - The shares differ from the amount by more than the tolerance
    ///   (`InvalidSplit`)
    /// - Summing the shares overflows (`ArithmeticOverflow`, naming the
    ///   participant whose share overflowed)
    pub fn validate(&self, group: &Group, expense: &Expense) -> Result<Split, LedgerError> {
        if expense.amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount {
                expense: expense.id,
                amount: expense.amount,
            });
        }

        if expense.split.is_empty() {
            return Err(LedgerError::EmptySplit {
                expense: expense.id,
            });
        }

        if !group.contains(&expense.payer) {
            return Err(LedgerError::unknown_member(expense.id, &expense.payer));
        }

        let mut split_total = Decimal::ZERO;
        for (member, share) in &expense.split {
            if !group.contains(member) {
                return Err(LedgerError::unknown_member(expense.id, member));
            }
            if share.is_sign_negative() && !share.is_zero() {
                return Err(LedgerError::negative_share(expense.id, member, *share));
            }
            split_total = split_total
                .checked_add(*share)
                .ok_or_else(|| LedgerError::arithmetic_overflow("split total", member))?;
        }

        let residual = expense.amount - split_total;
        if !self.config.is_negligible(residual) {
            return Err(LedgerError::invalid_split(
                expense.id,
                expense.amount,
                split_total,
            ));
        }

        let mut split = expense.split.clone();
        if !residual.is_zero() {
            absorb_residual(&mut split, residual);
        }

        Ok(split)
    }
}

/// One zero balance per group member
pub(crate) fn zero_balances(group: &Group) -> Balances {
    group.members().cloned().map(Balance::new).collect()
}

/// Credit the payer and debit every participant
///
/// Members must already be present in `balances`.
pub(crate) fn apply_expense(
    balances: &mut Balances,
    payer: &MemberId,
    amount: Decimal,
    split: &Split,
) -> Result<(), LedgerError> {
    if let Some(balance) = balances.get_mut(payer) {
        balance.credit(amount)?;
    }

    for (member, share) in split {
        if let Some(balance) = balances.get_mut(member) {
            balance.debit(*share)?;
        }
    }

    Ok(())
}

/// Fold a within-tolerance residual into the split so it sums exactly
///
/// A positive residual goes to the largest share (ties: smallest member id).
/// A negative residual is taken from the largest shares first, never pushing
/// a share below zero.
fn absorb_residual(split: &mut Split, residual: Decimal) {
    let mut by_size: Vec<(Reverse<Decimal>, MemberId)> = split
        .iter()
        .map(|(member, share)| (Reverse(*share), member.clone()))
        .collect();
    by_size.sort();

    if residual.is_sign_positive() {
        if let Some((_, largest)) = by_size.first() {
            if let Some(share) = split.get_mut(largest) {
                *share += residual;
            }
        }
        return;
    }

    let mut outstanding = -residual;
    for (_, member) in by_size {
        if outstanding.is_zero() {
            break;
        }
        if let Some(share) = split.get_mut(&member) {
            let taken = outstanding.min(*share);
            *share -= taken;
            outstanding -= taken;
        }
    }
}
