//! Settlement planning
//!
//! This module provides the `SettlementPlanner`, which converts a balance
//! mapping into a short sequence of transfers that zeroes every balance.
//!
//! # Algorithm
//!
//! The tolerance only decides whether the ledger balances at all. Every
//! member with a non-zero net is then a creditor or a debtor, however small
//! the amount, since many sub-tolerance debts can add up to a large credit.
//! The planner then repeatedly pairs the largest outstanding credit with the
//! largest outstanding debt, issues a transfer for the smaller of the two,
//! and drops whichever side reaches zero. Each step closes at least one
//! member, so a plan never has more than `creditors + debtors - 1`
//! transfers.
//!
//! Both sides are kept in ordered sets keyed by `(Reverse(magnitude),
//! member)`, so the largest magnitude comes first and equal magnitudes are
//! broken by the lexicographically smaller member id. Output is therefore
//! fully deterministic.

use crate::config::LedgerConfig;
use crate::types::{Balances, LedgerError, MemberId, SettlementPlan, Transfer};
use rust_decimal::Decimal;
use std::cmp::Reverse;
use std::collections::BTreeSet;

type Outstanding = BTreeSet<(Reverse<Decimal>, MemberId)>;

/// Plans transfers that settle a group
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementPlanner {
    config: LedgerConfig,
}

impl SettlementPlanner {
    /// Create a planner with the given numeric policy
    pub fn new(config: LedgerConfig) -> Self {
        Self { config }
    }

    /// Produce the settlement plan for `balances`
    ///
    /// # Returns
    ///
    /// Transfers in the order they were issued. Applying all of them brings
    /// every member's net balance to zero, within tolerance.
    ///
    /// # Errors
    ///
    /// Returns `UnbalancedLedger` if the nets do not sum to zero within the
    /// tolerance. That signals an upstream bug or corrupted data rather
    /// than a user mistake.
    pub fn plan_settlement(&self, balances: &Balances) -> Result<SettlementPlan, LedgerError> {
        // A total that overflows cannot balance
        let residual = balances.total_net().ok_or(LedgerError::UnbalancedLedger {
            residual: Decimal::MAX,
        })?;
        if !self.config.is_negligible(residual) {
            return Err(LedgerError::UnbalancedLedger { residual });
        }

        let (mut creditors, mut debtors) = self.partition(balances);
        let max_transfers = (creditors.len() + debtors.len()).saturating_sub(1);
        let mut transfers = Vec::with_capacity(max_transfers);

        while !creditors.is_empty() && !debtors.is_empty() {
            let (Some((Reverse(credit), to)), Some((Reverse(debt), from))) =
                (creditors.pop_first(), debtors.pop_first())
            else {
                break;
            };
            let amount = credit.min(debt);

            transfers.push(Transfer {
                from: from.clone(),
                to: to.clone(),
                amount,
            });

            let credit_left = credit - amount;
            let debt_left = debt - amount;
            if !credit_left.is_zero() {
                creditors.insert((Reverse(credit_left), to));
            }
            if !debt_left.is_zero() {
                debtors.insert((Reverse(debt_left), from));
            }
        }

        // Non-empty only when the nets summed to a non-zero residual within tolerance
        for (Reverse(dust), member) in creditors.iter().chain(debtors.iter()) {
            tracing::debug!(%member, %dust, "rounding dust left unsettled");
        }

        tracing::debug!(transfers = transfers.len(), "planned settlement");

        Ok(SettlementPlan::new(transfers))
    }

    /// Split members with a non-zero net into creditors and debtors
    fn partition(&self, balances: &Balances) -> (Outstanding, Outstanding) {
        let mut creditors = Outstanding::new();
        let mut debtors = Outstanding::new();

        for balance in balances.iter() {
            let net = balance.net();
            if net.is_zero() {
                continue;
            }
            if net.is_sign_positive() {
                creditors.insert((Reverse(net), balance.member.clone()));
            } else {
                debtors.insert((Reverse(-net), balance.member.clone()));
            }
        }

        (creditors, debtors)
    }
}
