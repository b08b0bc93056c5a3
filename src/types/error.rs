//! Error types for the Vaquita ledger
//!
//! This module defines all error types that can occur while loading expense
//! data, aggregating balances and planning settlements.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **CSV Errors**: Malformed CSV, invalid fields, bad split syntax
//! - **Group Errors**: Empty or duplicated roster
//! - **Expense Errors**: Unknown members, invalid splits, duplicate ids
//! - **Consistency Errors**: Balances that do not sum to zero
//! - **Arithmetic Errors**: Overflow in balance calculations
//!
//! Every failure is atomic: an operation that returns an error produces no
//! partial balances and no partial plan.

use super::expense::ExpenseId;
use super::member::MemberId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the ledger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// A CSV row parsed but its content is not a valid record
    #[error("Invalid record at line {line}: {message}")]
    InvalidRecord {
        /// Line number of the record (header is line 1)
        line: u64,
        /// What is wrong with the record
        message: String,
    },

    /// A group must have at least one member
    #[error("Group has no members")]
    EmptyGroup,

    /// A member id appears twice in a roster
    #[error("Member '{member}' is listed more than once")]
    DuplicateMember {
        /// The repeated member id
        member: String,
    },

    /// An expense references a member outside the group
    ///
    /// Data-integrity fault: the expense is rejected, never dropped.
    #[error("Expense {expense} references unknown member '{member}'")]
    UnknownMember {
        /// Offending expense
        expense: ExpenseId,
        /// The member not found in the group
        member: String,
    },

    /// Split shares do not add up to the expense amount
    #[error("Expense {expense} split totals {split_total}, expected {amount}")]
    InvalidSplit {
        /// Offending expense
        expense: ExpenseId,
        /// Amount paid
        amount: Decimal,
        /// Sum of all shares
        split_total: Decimal,
    },

    /// A split share is negative
    #[error("Expense {expense} assigns negative share {share} to '{member}'")]
    NegativeShare {
        /// Offending expense
        expense: ExpenseId,
        /// Member holding the share
        member: String,
        /// The negative share
        share: Decimal,
    },

    /// An expense has no participants
    #[error("Expense {expense} has no participants")]
    EmptySplit {
        /// Offending expense
        expense: ExpenseId,
    },

    /// Expense amounts must be strictly positive
    #[error("Expense {expense} has non-positive amount {amount}")]
    NonPositiveAmount {
        /// Offending expense
        expense: ExpenseId,
        /// The rejected amount
        amount: Decimal,
    },

    /// The same expense id appears more than once in one snapshot
    #[error("Duplicate expense ID {expense}")]
    DuplicateExpense {
        /// The repeated id
        expense: ExpenseId,
    },

    /// Balances handed to the planner do not sum to zero
    ///
    /// Internal consistency failure (aggregator bug or corrupted data), not a
    /// user-recoverable condition.
    #[error("Ledger is unbalanced: net balances sum to {residual}")]
    UnbalancedLedger {
        /// Sum of all net balances
        residual: Decimal,
    },

    /// Arithmetic overflow would occur
    #[error("Arithmetic overflow in {operation} for member '{member}'")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Member whose balance overflowed
        member: String,
    },

    /// The async runtime could not be built or a worker task failed
    #[error("Runtime error: {message}")]
    Runtime {
        /// Description of the failure
        message: String,
    },
}

impl LedgerError {
    /// Whether this error signals an internal consistency fault
    ///
    /// Such errors should trigger alerting in the surrounding system rather
    /// than a normal rejected-request response.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            LedgerError::UnbalancedLedger { .. } | LedgerError::Runtime { .. }
        )
    }

    /// Create a DuplicateMember error
    pub fn duplicate_member(member: &MemberId) -> Self {
        LedgerError::DuplicateMember {
            member: member.to_string(),
        }
    }

    /// Create an UnknownMember error
    pub fn unknown_member(expense: ExpenseId, member: &MemberId) -> Self {
        LedgerError::UnknownMember {
            expense,
            member: member.to_string(),
        }
    }

    /// Create an InvalidSplit error
    pub fn invalid_split(expense: ExpenseId, amount: Decimal, split_total: Decimal) -> Self {
        LedgerError::InvalidSplit {
            expense,
            amount,
            split_total,
        }
    }

    /// Create a NegativeShare error
    pub fn negative_share(expense: ExpenseId, member: &MemberId, share: Decimal) -> Self {
        LedgerError::NegativeShare {
            expense,
            member: member.to_string(),
            share,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, member: &MemberId) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            member: member.to_string(),
        }
    }

    /// Create an InvalidRecord error
    pub fn invalid_record(line: u64, message: impl Into<String>) -> Self {
        LedgerError::InvalidRecord {
            line,
            message: message.into(),
        }
    }

    /// Create a Runtime error
    pub fn runtime(message: impl Into<String>) -> Self {
        LedgerError::Runtime {
            message: message.into(),
        }
    }
}

// Conversion from io::Error to LedgerError
impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to LedgerError
impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Conversion from csv_async::Error to LedgerError
impl From<csv_async::Error> for LedgerError {
    fn from(error: csv_async::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}
