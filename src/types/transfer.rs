//! Transfer and settlement plan types
//!
//! A transfer is an instruction for one member to pay another; a settlement
//! plan is the ordered list of transfers that closes every open balance.

use super::balance::{Balance, Balances};
use super::error::LedgerError;
use super::expense::{Expense, ExpenseId, Split};
use super::member::MemberId;
use rust_decimal::Decimal;

/// Payment closing part or all of a debt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    /// The paying member (a debtor)
    pub from: MemberId,

    /// The receiving member (a creditor)
    pub to: MemberId,

    /// Amount paid, always positive
    pub amount: Decimal,
}

impl Transfer {
    pub fn new(from: impl Into<MemberId>, to: impl Into<MemberId>, amount: Decimal) -> Self {
        Transfer {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }

    /// Record this transfer as a compensating expense
    ///
    /// The sender is credited as payer and the receiver owes the full amount,
    /// so feeding the expense back into the ledger moves both members toward
    /// zero by `amount`.
    pub fn to_expense(&self, id: ExpenseId) -> Expense {
        let mut split = Split::new();
        split.insert(self.to.clone(), self.amount);
        Expense::new(id, self.from.clone(), self.amount, split)
            .with_description(format!("settlement {} -> {}", self.from, self.to))
    }
}

/// Ordered sequence of transfers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettlementPlan {
    transfers: Vec<Transfer>,
}

impl SettlementPlan {
    pub fn new(transfers: Vec<Transfer>) -> Self {
        SettlementPlan { transfers }
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    pub fn len(&self) -> usize {
        self.transfers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }

    /// Sum of all transferred amounts
    pub fn total_transferred(&self) -> Decimal {
        self.transfers.iter().map(|t| t.amount).sum()
    }

    /// Apply every transfer to `balances` and return the result
    ///
    /// Members named by a transfer but missing from `balances` start at zero.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow` if a balance would overflow.
    pub fn apply(&self, balances: &Balances) -> Result<Balances, LedgerError> {
        let mut settled = balances.clone();

        for transfer in &self.transfers {
            if settled.get(&transfer.from).is_none() {
                settled.insert(Balance::new(transfer.from.clone()));
            }
            if settled.get(&transfer.to).is_none() {
                settled.insert(Balance::new(transfer.to.clone()));
            }

            if let Some(sender) = settled.get_mut(&transfer.from) {
                sender.credit(transfer.amount)?;
            }
            if let Some(receiver) = settled.get_mut(&transfer.to) {
                receiver.debit(transfer.amount)?;
            }
        }

        Ok(settled)
    }
}

impl IntoIterator for SettlementPlan {
    type Item = Transfer;
    type IntoIter = std::vec::IntoIter<Transfer>;

    fn into_iter(self) -> Self::IntoIter {
        self.transfers.into_iter()
    }
}

impl<'a> IntoIterator for &'a SettlementPlan {
    type Item = &'a Transfer;
    type IntoIter = std::slice::Iter<'a, Transfer>;

    fn into_iter(self) -> Self::IntoIter {
        self.transfers.iter()
    }
}
