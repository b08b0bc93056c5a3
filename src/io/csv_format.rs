//! CSV format handling for rosters, expense records and reports
//!
//! This module centralizes all CSV format concerns, providing:
//! - Record structures for deserialization
//! - Conversion from CSV records to domain types, including split parsing
//! - Balance and settlement output serialization
//!
//! All functions are pure (no I/O) for easy testing.
//!
//! # Expense format
//!
//! ```text
//! expense,payer,amount,split,description
//! 1,alice,90.00,alice:30;bob:30;carol:30,dinner
//! 2,bob,25.00,alice;bob,taxi
//! 3,carol,60.00,,groceries
//! ```
//!
//! The `split` column takes one of three forms:
//! - `member:share;...` explicit shares
//! - `member;...` equal split among the listed members
//! - empty, an equal split among the whole group

use crate::types::{Balances, Expense, ExpenseId, Group, LedgerError, MemberId, SettlementPlan, Split};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Roster row: one member per line
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MemberCsvRecord {
    pub member: String,
}

/// Expense row
///
/// `split` and `description` are optional columns.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ExpenseCsvRecord {
    pub expense: ExpenseId,
    pub payer: String,
    pub amount: String,
    #[serde(default)]
    pub split: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Convert a roster row to a member id
pub fn convert_member_record(record: MemberCsvRecord, line: u64) -> Result<MemberId, LedgerError> {
    let member = record.member.trim();
    if member.is_empty() {
        return Err(LedgerError::invalid_record(line, "empty member id"));
    }
    Ok(MemberId::from(member))
}

/// Convert an expense row to an Expense
///
/// This function:
/// - Parses the amount string into a Decimal
/// - Parses the split column into explicit or equal shares
/// - Carries the description through when non-empty
///
/// Membership and split totals are not checked here; that is the
/// aggregator's job.
///
/// # Arguments
///
/// * `record` - The deserialized CSV row
/// * `line` - Line number of the row, for error messages
/// * `group` - Roster used when the split column is empty
/// * `scale` - Decimal places for equal-split shares
pub fn convert_expense_record(
    record: ExpenseCsvRecord,
    line: u64,
    group: &Group,
    scale: u32,
) -> Result<Expense, LedgerError> {
    let payer = record.payer.trim();
    if payer.is_empty() {
        return Err(LedgerError::invalid_record(
            line,
            format!("expense {} has no payer", record.expense),
        ));
    }

    let amount_str = record.amount.trim();
    if amount_str.is_empty() {
        return Err(LedgerError::invalid_record(
            line,
            format!("expense {} requires an amount", record.expense),
        ));
    }
    let amount = Decimal::from_str(amount_str).map_err(|_| {
        LedgerError::invalid_record(
            line,
            format!("Invalid amount '{}' for expense {}", record.amount, record.expense),
        )
    })?;

    let mut expense = match parse_split(record.split.as_deref().unwrap_or_default(), line)? {
        SplitSpec::Explicit(split) => Expense::new(record.expense, payer, amount, split),
        SplitSpec::Equal(members) => {
            Expense::equal(record.expense, payer, amount, members, scale)?
        }
        SplitSpec::WholeGroup => Expense::equal(
            record.expense,
            payer,
            amount,
            group.members().cloned(),
            scale,
        )?,
    };

    if let Some(description) = record.description {
        let description = description.trim();
        if !description.is_empty() {
            expense.description = Some(description.to_string());
        }
    }

    Ok(expense)
}

/// Parsed form of the split column
#[derive(Debug, Clone, PartialEq)]
enum SplitSpec {
    Explicit(Split),
    Equal(Vec<MemberId>),
    WholeGroup,
}

fn parse_split(text: &str, line: u64) -> Result<SplitSpec, LedgerError> {
    let entries: Vec<&str> = text
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect();

    if entries.is_empty() {
        return Ok(SplitSpec::WholeGroup);
    }

    let explicit = entries.iter().filter(|entry| entry.contains(':')).count();
    if explicit != 0 && explicit != entries.len() {
        return Err(LedgerError::invalid_record(
            line,
            format!("split '{}' mixes shares and bare members", text),
        ));
    }

    if explicit == 0 {
        let members = entries.into_iter().map(MemberId::from).collect();
        return Ok(SplitSpec::Equal(members));
    }

    let mut split = Split::new();
    for entry in entries {
        let (member, share) = entry.split_once(':').unwrap_or((entry, ""));
        let member = member.trim();
        let share = share.trim();

        if member.is_empty() {
            return Err(LedgerError::invalid_record(
                line,
                format!("split entry '{}' has no member", entry),
            ));
        }
        let share = Decimal::from_str(share).map_err(|_| {
            LedgerError::invalid_record(line, format!("Invalid share '{}' for '{}'", share, member))
        })?;

        if split.insert(MemberId::from(member), share).is_some() {
            return Err(LedgerError::invalid_record(
                line,
                format!("member '{}' appears twice in split", member),
            ));
        }
    }

    Ok(SplitSpec::Explicit(split))
}

/// Format an amount with exactly `scale` decimal places
fn format_amount(amount: Decimal, scale: u32) -> String {
    let mut rounded = amount.round_dp(scale);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded.rescale(scale);
    rounded.to_string()
}

/// Write balances to CSV format
///
/// Writes one row per member with columns: member, paid, owed, net.
/// Rows are ordered by member id.
pub fn write_balances_csv(
    balances: &Balances,
    scale: u32,
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["member", "paid", "owed", "net"])?;

    for balance in balances.iter() {
        writer.write_record(&[
            balance.member.to_string(),
            format_amount(balance.paid, scale),
            format_amount(balance.owed, scale),
            format_amount(balance.net(), scale),
        ])?;
    }

    writer.flush()?;

    Ok(())
}

/// Write a settlement plan to CSV format
///
/// Writes one row per transfer, in plan order, with columns: from, to, amount.
pub fn write_transfers_csv(
    plan: &SettlementPlan,
    scale: u32,
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["from", "to", "amount"])?;

    for transfer in plan {
        writer.write_record(&[
            transfer.from.to_string(),
            transfer.to.to_string(),
            format_amount(transfer.amount, scale),
        ])?;
    }

    writer.flush()?;

    Ok(())
}
