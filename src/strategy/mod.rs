//! Processing strategy module
//!
//! This module defines the Strategy pattern for the complete ledger pipeline:
//! loading the roster, aggregating the expense log, and writing a report. The
//! aggregation step is what differs between implementations (sequential or
//! batched parallel), and is selected at runtime.

use crate::cli::{ReportKind, StrategyType};
use crate::config::LedgerConfig;
use crate::core::SettlementPlanner;
use crate::io::{read_group, write_balances_csv, write_transfers_csv};
use crate::types::{Balances, Group, LedgerError};
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete ledger pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Numeric policy this strategy aggregates with
    fn config(&self) -> &LedgerConfig;

    /// Aggregate the expense log at `expenses_path` into balances
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, any row is malformed, or
    /// any expense fails validation. No balances are returned on error.
    fn compute_balances(&self, group: &Group, expenses_path: &Path)
        -> Result<Balances, LedgerError>;

    /// Run the whole pipeline and write the requested report to `output`
    ///
    /// 1. Loads the roster from `members_path`
    /// 2. Aggregates the expenses with [`ProcessingStrategy::compute_balances`]
    /// 3. Writes balances, or plans and writes the settlement
    ///
    /// # Errors
    ///
    /// Any error aborts the run before output is written.
    fn process(
        &self,
        members_path: &Path,
        expenses_path: &Path,
        report: ReportKind,
        output: &mut dyn Write,
    ) -> Result<(), LedgerError> {
        let group = read_group(members_path)?;
        tracing::info!(members = group.len(), "loaded group roster");

        let balances = self.compute_balances(&group, expenses_path)?;
        let scale = self.config().share_scale;

        match report {
            ReportKind::Balances => write_balances_csv(&balances, scale, output),
            ReportKind::Settlement => {
                let plan = SettlementPlanner::new(*self.config()).plan_settlement(&balances)?;
                tracing::info!(
                    transfers = plan.len(),
                    total = %plan.total_transferred(),
                    "planned settlement"
                );
                write_transfers_csv(&plan, scale, output)
            }
        }
    }
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `config` - Numeric policy shared by both strategies
/// * `batch_config` - Optional batch configuration (ignored for sync)
pub fn create_strategy(
    strategy_type: StrategyType,
    config: LedgerConfig,
    batch_config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(config)),
        StrategyType::Async => {
            let batch_config = batch_config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config, batch_config))
        }
    }
}
