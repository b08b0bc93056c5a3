//! Synchronous processing strategy
//!
//! This module provides a sequential implementation of the ProcessingStrategy
//! trait. It streams expenses through an `ExpenseReader` directly into the
//! `BalanceAggregator`, one row at a time.
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV parsing to `ExpenseReader` (iterator interface)
//! - Validation and aggregation to `BalanceAggregator`
//! - Output to the csv_format module (via the trait's `process`)

use crate::config::LedgerConfig;
use crate::core::BalanceAggregator;
use crate::io::sync_reader::ExpenseReader;
use crate::strategy::ProcessingStrategy;
use crate::types::{Balances, Group, LedgerError};
use std::path::Path;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use vaquita_ledger::cli::ReportKind;
/// use vaquita_ledger::config::LedgerConfig;
/// use vaquita_ledger::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy::new(LedgerConfig::default());
/// let mut output = io::stdout();
///
/// strategy
///     .process(
///         Path::new("members.csv"),
///         Path::new("expenses.csv"),
///         ReportKind::Settlement,
///         &mut output,
///     )
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncProcessingStrategy {
    aggregator: BalanceAggregator,
}

impl SyncProcessingStrategy {
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            aggregator: BalanceAggregator::new(config),
        }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn config(&self) -> &LedgerConfig {
        self.aggregator.config()
    }

    /// Stream expenses from the reader straight into the aggregator
    fn compute_balances(
        &self,
        group: &Group,
        expenses_path: &Path,
    ) -> Result<Balances, LedgerError> {
        let reader = ExpenseReader::new(expenses_path, group, self.config().share_scale)?;
        let balances = self.aggregator.aggregate(group, reader)?;
        tracing::info!(members = balances.len(), "aggregated expense log");

        Ok(balances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ReportKind;
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

    fn run(members: &str, expenses: &str, report: ReportKind) -> Result<String, LedgerError> {
        let members = create_temp_csv(members);
        let expenses = create_temp_csv(expenses);
        let mut output = Vec::new();

        SyncProcessingStrategy::default().process(
            members.path(),
            expenses.path(),
            report,
            &mut output,
        )?;

        Ok(String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_sync_strategy_settlement() {
        let output = run(
            "member\nA\nB\nC\n",
            "expense,payer,amount,split\n1,A,90,A:30;B:30;C:30\n",
            ReportKind::Settlement,
        )
        .unwrap();

        assert_eq!(output, "from,to,amount\nB,A,30.00\nC,A,30.00\n");
    }

    #[test]
    fn test_sync_strategy_balances() {
        let output = run(
            "member\nA\nB\nC\nD\n",
            "expense,payer,amount,split\n1,A,90,A:30;B:30;C:30\n",
            ReportKind::Balances,
        )
        .unwrap();

        assert_eq!(
            output,
            "member,paid,owed,net\n\
             A,90.00,30.00,60.00\n\
             B,0.00,30.00,-30.00\n\
             C,0.00,30.00,-30.00\n\
             D,0.00,0.00,0.00\n"
        );
    }

    #[test]
    fn test_sync_strategy_rejects_invalid_split() {
        let result = run(
            "member\nA\nB\n",
            "expense,payer,amount,split\n1,A,100,A:50;B:45\n",
            ReportKind::Settlement,
        );
        assert!(matches!(result, Err(LedgerError::InvalidSplit { expense: 1, .. })));
    }

    #[test]
    fn test_sync_strategy_rejects_malformed_record() {
        let result = run(
            "member\nA\nB\n",
            "expense,payer,amount,split\n1,A,100,B\n2,A,oops,B\n",
            ReportKind::Balances,
        );
        assert!(matches!(result, Err(LedgerError::InvalidRecord { line: 3, .. })));
    }

    #[test]
    fn test_sync_strategy_handles_missing_file() {
        let members = create_temp_csv("member\nA\n");
        let mut output = Vec::new();

        let result = SyncProcessingStrategy::default().process(
            members.path(),
            Path::new("nonexistent.csv"),
            ReportKind::Settlement,
            &mut output,
        );

        assert!(matches!(result, Err(LedgerError::FileNotFound { .. })));
        assert!(output.is_empty());
    }

    #[test]
    fn test_sync_strategy_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SyncProcessingStrategy>();
    }
}
