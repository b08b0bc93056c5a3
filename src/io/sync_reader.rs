//! Synchronous CSV readers
//!
//! Provides the roster loader and a streaming iterator over expense records.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! `ExpenseReader` implements the Iterator trait, yielding
//! `Result<Expense, LedgerError>` for each CSV row:
//!
//! ```no_run
//! use vaquita_ledger::io::sync_reader::{read_group, ExpenseReader};
//! use std::path::Path;
//!
//! let group = read_group(Path::new("members.csv")).unwrap();
//! let reader = ExpenseReader::new(Path::new("expenses.csv"), &group, 2).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(expense) => println!("Loaded expense: {:?}", expense),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual record errors are yielded as Err variants with line numbers

use crate::io::csv_format::{
    convert_expense_record, convert_member_record, ExpenseCsvRecord, MemberCsvRecord,
};
use crate::io::open_error;
use crate::types::{Expense, Group, LedgerError};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .buffer_capacity(8 * 1024)
        .from_reader(reader)
}

/// Load a group roster from a CSV file
///
/// # Errors
///
/// Returns an error if the file cannot be opened, a row is malformed, or the
/// roster is empty or repeats a member.
pub fn read_group(path: &Path) -> Result<Group, LedgerError> {
    let file = File::open(path).map_err(|e| open_error(path, e))?;
    read_group_from(file)
}

/// Load a group roster from any reader
pub fn read_group_from<R: Read>(reader: R) -> Result<Group, LedgerError> {
    let mut reader = csv_reader(reader);
    let mut members = Vec::new();

    for (index, row) in reader.deserialize::<MemberCsvRecord>().enumerate() {
        // Line 1 is the header
        let line = index as u64 + 2;
        members.push(convert_member_record(row?, line)?);
    }

    Group::new(members)
}

/// Synchronous expense reader
///
/// Provides an iterator interface over expense records. Streams one row at
/// a time; the roster is borrowed to expand whole-group splits.
#[derive(Debug)]
pub struct ExpenseReader<'g, R: Read = File> {
    reader: csv::Reader<R>,
    group: &'g Group,
    scale: u32,
    line_num: u64,
}

impl<'g> ExpenseReader<'g, File> {
    /// Open an expense CSV file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the CSV file
    /// * `group` - Roster used for whole-group equal splits
    /// * `scale` - Decimal places for generated equal-split shares
    pub fn new(path: &Path, group: &'g Group, scale: u32) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|e| open_error(path, e))?;
        Ok(Self::from_reader(file, group, scale))
    }
}

impl<'g, R: Read> ExpenseReader<'g, R> {
    /// Read expenses from any reader
    pub fn from_reader(reader: R, group: &'g Group, scale: u32) -> Self {
        Self {
            reader: csv_reader(reader),
            group,
            scale,
            line_num: 1,
        }
    }
}

impl<R: Read> Iterator for ExpenseReader<'_, R> {
    type Item = Result<Expense, LedgerError>;

    /// Get the next expense from the CSV input
    ///
    /// # Returns
    ///
    /// * `Some(Ok(Expense))` - Successfully parsed record
    /// * `Some(Err(LedgerError))` - Parse or conversion error with line number
    /// * `None` - End of input reached
    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<ExpenseCsvRecord>();
        let row = deserializer.next()?;
        self.line_num += 1;

        Some(match row {
            Ok(record) => convert_expense_record(record, self.line_num, self.group, self.scale),
            Err(e) => Err(e.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MemberId;
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn group() -> Group {
        Group::new(["alice", "bob", "carol"]).unwrap()
    }

    #[test]
    fn test_read_group() {
        let file = create_temp_csv("member\ncarol\nalice\n  bob  \n");
        let group = read_group(file.path()).unwrap();
        let members: Vec<&str> = group.members().map(MemberId::as_str).collect();
        assert_eq!(members, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_read_group_missing_file() {
        let result = read_group(Path::new("nonexistent.csv"));
        assert_eq!(
            result,
            Err(LedgerError::FileNotFound {
                path: "nonexistent.csv".to_string()
            })
        );
    }

    #[test]
    fn test_read_group_empty_roster() {
        let result = read_group_from("member\n".as_bytes());
        assert_eq!(result, Err(LedgerError::EmptyGroup));
    }

    #[test]
    fn test_read_group_duplicate_member() {
        let result = read_group_from("member\nalice\nalice\n".as_bytes());
        assert!(matches!(result, Err(LedgerError::DuplicateMember { .. })));
    }

    #[test]
    fn test_expense_reader_new_fails_on_missing_file() {
        let group = group();
        let result = ExpenseReader::new(Path::new("nonexistent.csv"), &group, 2);
        assert!(matches!(result, Err(LedgerError::FileNotFound { .. })));
    }

    #[test]
    fn test_expense_reader_iterates_records() {
        let csv_content = "expense,payer,amount,split,description\n\
            1,alice,90.00,alice:30;bob:30;carol:30,dinner\n\
            2,bob,25.00,alice;bob,taxi\n\
            3,carol,60.00,,groceries\n";
        let file = create_temp_csv(csv_content);
        let group = group();

        let reader = ExpenseReader::new(file.path(), &group, 2).unwrap();
        let expenses: Vec<Expense> = reader.collect::<Result<_, _>>().unwrap();

        assert_eq!(expenses.len(), 3);
        assert_eq!(expenses[0].split.len(), 3);
        assert_eq!(expenses[0].description.as_deref(), Some("dinner"));
        assert_eq!(
            expenses[1].split.get(&MemberId::from("alice")),
            Some(&Decimal::new(1250, 2))
        );
        assert_eq!(expenses[2].split.len(), 3);
        assert_eq!(expenses[2].payer, MemberId::from("carol"));
    }

    #[test]
    fn test_expense_reader_without_optional_columns() {
        let csv_content = "expense,payer,amount\n1,alice,30\n";
        let group = group();

        let reader = ExpenseReader::from_reader(csv_content.as_bytes(), &group, 2);
        let expenses: Vec<Expense> = reader.collect::<Result<_, _>>().unwrap();

        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].split.len(), 3);
        assert_eq!(expenses[0].description, None);
    }

    #[test]
    fn test_expense_reader_includes_line_numbers_in_errors() {
        let csv_content = "expense,payer,amount,split\n\
            1,alice,10,bob\n\
            2,alice,invalid,bob\n\
            3,alice,10,bob\n";
        let group = group();

        let reader = ExpenseReader::from_reader(csv_content.as_bytes(), &group, 2);
        let records: Vec<_> = reader.collect();

        assert_eq!(records.len(), 3);
        assert!(records[0].is_ok());
        assert!(records[2].is_ok());
        assert!(matches!(
            records[1],
            Err(LedgerError::InvalidRecord { line: 3, .. })
        ));
    }

    #[test]
    fn test_expense_reader_reports_malformed_id() {
        let csv_content = "expense,payer,amount,split\nnot_a_number,alice,10,bob\n";
        let group = group();

        let reader = ExpenseReader::from_reader(csv_content.as_bytes(), &group, 2);
        let records: Vec<_> = reader.collect();

        assert_eq!(records.len(), 1);
        assert!(matches!(records[0], Err(LedgerError::ParseError { .. })));
    }

    #[test]
    fn test_expense_reader_handles_whitespace() {
        let csv_content = "expense,payer,amount,split\n  1  ,  alice  ,  10.50  ,  bob : 10.50  \n";
        let group = group();

        let reader = ExpenseReader::from_reader(csv_content.as_bytes(), &group, 2);
        let expenses: Vec<Expense> = reader.collect::<Result<_, _>>().unwrap();

        assert_eq!(expenses[0].amount, Decimal::new(1050, 2));
        assert_eq!(
            expenses[0].split.get(&MemberId::from("bob")),
            Some(&Decimal::new(1050, 2))
        );
    }

    #[test]
    fn test_expense_reader_empty_after_header() {
        let group = group();
        let reader = ExpenseReader::from_reader("expense,payer,amount,split\n".as_bytes(), &group, 2);
        assert_eq!(reader.count(), 0);
    }
}
