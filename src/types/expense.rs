//! Expense-related types for the Vaquita ledger
//!
//! An expense records one payment and how its cost is divided among the
//! participants. Expenses are never edited after creation; a correction is a
//! new, compensating expense.

use super::member::MemberId;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Expense identifier
///
/// Supports expense IDs from 0 to 4,294,967,295
pub type ExpenseId = u32;

/// How an expense's amount is divided, member to share
///
/// Ordered by member id so that iteration, and therefore every derived
/// value, is deterministic.
pub type Split = BTreeMap<MemberId, Decimal>;

/// A single shared expense
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// Unique expense identifier
    pub id: ExpenseId,

    /// The member who paid
    ///
    /// Need not be one of the participants (paying on behalf of others).
    pub payer: MemberId,

    /// Total paid, must be positive
    pub amount: Decimal,

    /// Share owed by each participant
    ///
    /// Shares are non-negative and sum to `amount` within the ledger's
    /// tolerance. The participants are exactly the keys of this map.
    pub split: Split,

    /// Free-text note carried for the caller; never used in computation
    pub description: Option<String>,
}

impl Expense {
    /// Create an expense with an explicit split and no description
    pub fn new(id: ExpenseId, payer: impl Into<MemberId>, amount: Decimal, split: Split) -> Self {
        Expense {
            id,
            payer: payer.into(),
            amount,
            split,
            description: None,
        }
    }

    /// Attach a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Participants of this expense, in member-id order
    pub fn participants(&self) -> impl Iterator<Item = &MemberId> {
        self.split.keys()
    }

    /// Sum of all shares in the split
    ///
    /// Returns `None` on decimal overflow.
    pub fn split_total(&self) -> Option<Decimal> {
        self.split
            .values()
            .try_fold(Decimal::ZERO, |acc, share| acc.checked_add(*share))
    }
}
