//! Balance types for the Vaquita ledger
//!
//! Balances are derived data: they are recomputed from the expense set on
//! every call and never stored on their own.

use super::error::LedgerError;
use super::member::MemberId;
use rust_decimal::Decimal;
use std::collections::btree_map;
use std::collections::BTreeMap;

/// A member's position within a group
///
/// `net = paid - owed`. Positive means the group owes the member, negative
/// means the member owes the group.
#[derive(Debug, Clone, PartialEq)]
pub struct Balance {
    /// The member this balance belongs to
    pub member: MemberId,

    /// Total credited as payer
    pub paid: Decimal,

    /// Total debited as participant
    pub owed: Decimal,
}

impl Balance {
    /// Create a zero balance for a member
    pub fn new(member: MemberId) -> Self {
        Balance {
            member,
            paid: Decimal::ZERO,
            owed: Decimal::ZERO,
        }
    }

    /// Create a balance that carries only a net position
    ///
    /// The positive part lands in `paid`, the negative part in `owed`.
    pub fn from_net(member: MemberId, net: Decimal) -> Self {
        if net.is_sign_negative() {
            Balance {
                member,
                paid: Decimal::ZERO,
                owed: -net,
            }
        } else {
            Balance {
                member,
                paid: net,
                owed: Decimal::ZERO,
            }
        }
    }

    /// Net position, paid minus owed
    pub fn net(&self) -> Decimal {
        self.paid - self.owed
    }

    /// Credit the member as payer
    pub fn credit(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        self.paid = self
            .paid
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("credit", &self.member))?;
        Ok(())
    }

    /// Debit the member as participant
    pub fn debit(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        self.owed = self
            .owed
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("debit", &self.member))?;
        Ok(())
    }
}

/// Balance of every member of a group, keyed by member id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Balances {
    entries: BTreeMap<MemberId, Balance>,
}

impl Balances {
    /// Create an empty mapping
    pub fn new() -> Self {
        Balances::default()
    }

    /// Build a mapping from bare net positions
    ///
    /// Useful for callers that already hold net figures (and for tests).
    /// Later entries for the same member replace earlier ones.
    pub fn from_nets<I, M>(nets: I) -> Self
    where
        I: IntoIterator<Item = (M, Decimal)>,
        M: Into<MemberId>,
    {
        let entries = nets
            .into_iter()
            .map(|(member, net)| {
                let member = member.into();
                (member.clone(), Balance::from_net(member, net))
            })
            .collect();
        Balances { entries }
    }

    /// Insert or replace a member's balance
    pub fn insert(&mut self, balance: Balance) {
        self.entries.insert(balance.member.clone(), balance);
    }

    /// Look up a member's balance
    pub fn get(&self, member: &MemberId) -> Option<&Balance> {
        self.entries.get(member)
    }

    pub(crate) fn get_mut(&mut self, member: &MemberId) -> Option<&mut Balance> {
        self.entries.get_mut(member)
    }

    /// Net position of a member, or `None` if the member is absent
    pub fn net(&self, member: &MemberId) -> Option<Decimal> {
        self.get(member).map(Balance::net)
    }

    /// Sum of every member's net position
    ///
    /// Zero for a conserving ledger. Returns `None` on decimal overflow.
    pub fn total_net(&self) -> Option<Decimal> {
        self.entries
            .values()
            .try_fold(Decimal::ZERO, |acc, balance| acc.checked_add(balance.net()))
    }

    /// Balances in member-id order
    pub fn iter(&self) -> impl Iterator<Item = &Balance> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Balance> for Balances {
    fn from_iter<T: IntoIterator<Item = Balance>>(iter: T) -> Self {
        let mut balances = Balances::new();
        for balance in iter {
            balances.insert(balance);
        }
        balances
    }
}

impl IntoIterator for Balances {
    type Item = Balance;
    type IntoIter = btree_map::IntoValues<MemberId, Balance>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}
