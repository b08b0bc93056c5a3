//! Equal-split construction
//!
//! Most shared spendings are divided evenly. Dividing an amount by the
//! number of participants rarely lands on whole minor units, so shares are
//! rounded down to the configured scale and the leftover units are handed
//! out one at a time, in member-id order, until the shares sum exactly to
//! the amount.

use crate::config::MAX_SHARE_SCALE;
use crate::types::{Expense, ExpenseId, LedgerError, MemberId, Split};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeSet;

/// Divide `amount` evenly among `participants`
///
/// Shares are expressed with `scale` decimal places, at most
/// [`MAX_SHARE_SCALE`]. Duplicate participants are collapsed.
///
/// # Errors
///
/// Returns an error if:
/// - There are no participants (`EmptySplit`, reported against expense 0)
/// - The amount is negative (`NonPositiveAmount`, reported against expense 0)
///
/// Callers that know the expense id should prefer [`Expense::equal`], which
/// reports the right id.
pub fn equal_split<I>(amount: Decimal, participants: I, scale: u32) -> Result<Split, LedgerError>
where
    I: IntoIterator,
    I::Item: Into<MemberId>,
{
    split_evenly(0, amount, participants, scale)
}

fn split_evenly<I>(
    expense: ExpenseId,
    amount: Decimal,
    participants: I,
    scale: u32,
) -> Result<Split, LedgerError>
where
    I: IntoIterator,
    I::Item: Into<MemberId>,
{
    let members: BTreeSet<MemberId> = participants.into_iter().map(Into::into).collect();
    if members.is_empty() {
        return Err(LedgerError::EmptySplit { expense });
    }
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(LedgerError::NonPositiveAmount { expense, amount });
    }

    let scale = scale.min(MAX_SHARE_SCALE);
    let count = Decimal::from(members.len());
    let base = (amount / count).round_dp_with_strategy(scale, RoundingStrategy::ToZero);
    let unit = Decimal::new(1, scale);

    // Whatever rounding left over, handed out one minor unit at a time
    let mut remainder = amount - base * count;

    let mut split = Split::new();
    for member in members {
        let share = if remainder >= unit {
            remainder -= unit;
            base + unit
        } else {
            base
        };
        split.insert(member, share);
    }

    // Amounts finer than `scale` leave a sub-unit residue; it goes to the
    // first participant so the split still sums exactly.
    if !remainder.is_zero() {
        if let Some(first) = split.values_mut().next() {
            *first += remainder;
        }
    }

    Ok(split)
}

impl Expense {
    /// Create an expense divided evenly among `participants`
    ///
    /// See [`equal_split`] for how leftover minor units are distributed.
    pub fn equal<I>(
        id: ExpenseId,
        payer: impl Into<MemberId>,
        amount: Decimal,
        participants: I,
        scale: u32,
    ) -> Result<Expense, LedgerError>
    where
        I: IntoIterator,
        I::Item: Into<MemberId>,
    {
        let split = split_evenly(id, amount, participants, scale)?;
        Ok(Expense::new(id, payer, amount, split))
    }
}
