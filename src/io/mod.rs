//! I/O module
//!
//! Handles CSV parsing and output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, report serialization)
//! - `sync_reader` - Roster loading and synchronous expense iteration
//! - `async_reader` - Asynchronous expense reader with batch reading interface

pub mod async_reader;
pub mod csv_format;
pub mod sync_reader;

pub use async_reader::AsyncExpenseReader;
pub use csv_format::{
    convert_expense_record, convert_member_record, write_balances_csv, write_transfers_csv,
    ExpenseCsvRecord, MemberCsvRecord,
};
pub use sync_reader::{read_group, read_group_from, ExpenseReader};

use crate::types::LedgerError;
use std::path::Path;

/// Map a failure to open `path` to a ledger error
pub(crate) fn open_error(path: &Path, error: std::io::Error) -> LedgerError {
    match error.kind() {
        std::io::ErrorKind::NotFound => LedgerError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => LedgerError::IoError {
            message: format!("Failed to open file '{}': {}", path.display(), error),
        },
    }
}
