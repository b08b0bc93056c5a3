//! Asynchronous CSV reader with batch interface
//!
//! Provides batch reading over expense records for the async strategy.
//!
//! # Design
//!
//! The AsyncExpenseReader uses:
//! - csv-async for streaming CSV parsing
//! - the csv_format module for record conversion
//!
//! ```text
//! CSV Reader → AsyncExpenseReader → Batches of Expenses
//!                     ↓
//!              csv_format module
//!              (ExpenseCsvRecord, convert_expense_record)
//! ```
//!
//! An expense snapshot must be complete: the first bad row ends the read
//! with an error. Rows read before it are still returned first, so that the
//! caller sees faults in file order.

use crate::io::csv_format::{convert_expense_record, ExpenseCsvRecord};
use crate::types::{Expense, Group, LedgerError};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use std::sync::Arc;

/// Asynchronous expense reader
pub struct AsyncExpenseReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    group: Arc<Group>,
    scale: u32,
    line_num: u64,
    pending: Option<LedgerError>,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncExpenseReader<R> {
    /// Create a new AsyncExpenseReader from an async reader
    ///
    /// # Arguments
    ///
    /// * `reader` - Async reader providing CSV data
    /// * `group` - Roster used for whole-group equal splits
    /// * `scale` - Decimal places for generated equal-split shares
    pub fn new(reader: R, group: Arc<Group>, scale: u32) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            group,
            scale,
            line_num: 1,
            pending: None,
        }
    }

    /// Read a batch of expenses
    ///
    /// Reads up to `batch_size` records. Returns an empty vector once the end
    /// of the input is reached.
    ///
    /// # Errors
    ///
    /// Returns the first parse or conversion error, with its line number. If
    /// valid rows precede the bad one in this batch, they are returned first
    /// and the error is returned by the next call.
    pub async fn read_batch(&mut self, batch_size: usize) -> Result<Vec<Expense>, LedgerError> {
        if let Some(error) = self.pending.take() {
            return Err(error);
        }

        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<ExpenseCsvRecord>();

        while batch.len() < batch_size {
            let result = match records.next().await {
                Some(Ok(record)) => {
                    self.line_num += 1;
                    convert_expense_record(record, self.line_num, &self.group, self.scale)
                }
                Some(Err(e)) => Err(e.into()),
                None => break,
            };

            match result {
                Ok(expense) => batch.push(expense),
                Err(error) if batch.is_empty() => return Err(error),
                Err(error) => {
                    self.pending = Some(error);
                    break;
                }
            }
        }

        Ok(batch)
    }
}
