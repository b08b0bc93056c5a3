//! Thread-safe balance accumulation for async batch processing
//!
//! This module provides the `BalanceAccumulator` struct, which holds running
//! member balances in a `DashMap` so that many tasks can apply expenses at the
//! same time.
//!
//! # Design
//!
//! Aggregation is a sum, and sums commute: applying the same expenses from
//! several tasks in any interleaving ends in exactly the same balances as
//! applying them one by one. Each credit or debit only needs the lock of the
//! member entry it touches, which `DashMap`'s sharding provides.

use crate::types::{Balance, Balances, ExpenseId, Group, LedgerError, MemberId, Split};
use dashmap::{DashMap, DashSet};
use rust_decimal::Decimal;

/// Thread-safe running balances for one group
#[derive(Debug)]
pub struct BalanceAccumulator {
    /// Running balance per member, seeded with the whole roster
    balances: DashMap<MemberId, Balance>,

    /// Expense ids already accepted
    seen: DashSet<ExpenseId>,
}

impl BalanceAccumulator {
    /// Create an accumulator with a zero balance for every group member
    pub fn new(group: &Group) -> Self {
        let balances = DashMap::with_capacity(group.len());
        for member in group.members() {
            balances.insert(member.clone(), Balance::new(member.clone()));
        }

        Self {
            balances,
            seen: DashSet::new(),
        }
    }

    /// Record an expense id
    ///
    /// Returns `false` if the id was already recorded.
    pub fn record(&self, expense: ExpenseId) -> bool {
        self.seen.insert(expense)
    }

    /// Credit the payer and debit every participant
    ///
    /// Members absent from the roster are ignored; callers validate
    /// expenses against the group first.
    pub fn apply(&self, payer: &MemberId, amount: Decimal, split: &Split) -> Result<(), LedgerError> {
        if let Some(mut balance) = self.balances.get_mut(payer) {
            balance.credit(amount)?;
        }

        for (member, share) in split {
            if let Some(mut balance) = self.balances.get_mut(member) {
                balance.debit(*share)?;
            }
        }

        Ok(())
    }

    /// Copy of the current balances, ordered by member id
    pub fn snapshot(&self) -> Balances {
        self.balances
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn group() -> Group {
        Group::new(["A", "B", "C"]).unwrap()
    }

    #[test]
    fn test_new_seeds_every_member() {
        let accumulator = BalanceAccumulator::new(&group());
        let snapshot = accumulator.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert!(snapshot.iter().all(|b| b.net().is_zero()));
    }

    #[test]
    fn test_record_detects_duplicates() {
        let accumulator = BalanceAccumulator::new(&group());
        assert!(accumulator.record(1));
        assert!(accumulator.record(2));
        assert!(!accumulator.record(1));
    }

    #[test]
    fn test_apply() {
        let accumulator = BalanceAccumulator::new(&group());
        let split: Split = [("B", 30), ("C", 30)]
            .into_iter()
            .map(|(m, s)| (MemberId::from(m), Decimal::new(s, 0)))
            .collect();

        accumulator
            .apply(&MemberId::from("A"), Decimal::new(60, 0), &split)
            .unwrap();

        let snapshot = accumulator.snapshot();
        assert_eq!(snapshot.net(&MemberId::from("A")), Some(Decimal::new(60, 0)));
        assert_eq!(snapshot.net(&MemberId::from("B")), Some(Decimal::new(-30, 0)));
        assert_eq!(snapshot.total_net(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_concurrent_apply_is_exact() {
        let accumulator = Arc::new(BalanceAccumulator::new(&group()));
        let split: Split = [("A", 1), ("B", 1), ("C", 1)]
            .into_iter()
            .map(|(m, s)| (MemberId::from(m), Decimal::new(s, 2)))
            .collect();

        let handles: Vec<_> = ["A", "B", "C", "A"]
            .into_iter()
            .map(|payer| {
                let accumulator = Arc::clone(&accumulator);
                let split = split.clone();
                thread::spawn(move || {
                    for _ in 0..250 {
                        accumulator
                            .apply(&MemberId::from(payer), Decimal::new(3, 2), &split)
                            .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = accumulator.snapshot();
        assert_eq!(snapshot.total_net(), Some(Decimal::ZERO));
        // A paid 500 times 0.03 and owes 1000 times 0.01
        assert_eq!(snapshot.net(&MemberId::from("A")), Some(Decimal::new(500, 2)));
    }
}
