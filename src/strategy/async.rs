//! Asynchronous batch processing strategy
//!
//! This module provides an asynchronous, multi-threaded implementation of the
//! ProcessingStrategy trait. It reads expenses in batches and aggregates each
//! batch across several tokio tasks.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── LedgerConfig (tolerance, share scale)
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncExpenseReader (batch CSV reading)
//!     └── BatchAggregator (chunking + tasks)
//!         └── BalanceAccumulator (thread-safe running balances)
//! ```
//!
//! # Determinism
//!
//! Aggregation is a sum, so the final balances do not depend on how batches
//! are chunked or scheduled. Batches are still read and awaited one at a time,
//! so that the first failing expense in file order is the one reported.

use crate::config::LedgerConfig;
use crate::core::r#async::{BalanceAccumulator, BatchAggregator};
use crate::core::BalanceAggregator;
use crate::io::async_reader::AsyncExpenseReader;
use crate::io::open_error;
use crate::strategy::ProcessingStrategy;
use crate::types::{Balances, Group, LedgerError};
use std::path::Path;
use std::sync::Arc;

/// Configuration for batch processing
///
/// Controls how expenses are batched and the number of worker threads
/// aggregating each batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of expenses per batch
    pub batch_size: usize,
    /// Maximum number of tasks aggregating a batch concurrently
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values are replaced by defaults with a warning.
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            tracing::warn!(
                max_concurrent_batches,
                default = default.max_concurrent_batches,
                "invalid concurrency limit, using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
///
/// Implements the ProcessingStrategy trait with batched, multi-threaded
/// aggregation. Produces exactly the balances and errors of
/// [`SyncProcessingStrategy`](crate::strategy::SyncProcessingStrategy).
///
/// # Configuration
///
/// - `batch_size`: Number of expenses per batch (default: 1000)
/// - `max_concurrent_batches`: Worker threads and tasks per batch (default: CPU cores)
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    ledger: LedgerConfig,
    batches: BatchConfig,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy
    ///
    /// # Arguments
    ///
    /// * `ledger` - Numeric policy for validation and output
    /// * `batches` - BatchConfig with batch_size and max_concurrent_batches;
    ///   zero values fall back to defaults as in [`BatchConfig::new`]
    pub fn new(ledger: LedgerConfig, batches: BatchConfig) -> Self {
        let batches = BatchConfig::new(batches.batch_size, batches.max_concurrent_batches);
        Self { ledger, batches }
    }

    pub fn batch_config(&self) -> &BatchConfig {
        &self.batches
    }

    async fn aggregate(&self, group: Arc<Group>, expenses_path: &Path) -> Result<Balances, LedgerError> {
        let accumulator = Arc::new(BalanceAccumulator::new(&group));
        let aggregator = BatchAggregator::new(
            BalanceAggregator::new(self.ledger),
            Arc::clone(&group),
            Arc::clone(&accumulator),
            self.batches.max_concurrent_batches,
        );

        let file = tokio::fs::File::open(expenses_path)
            .await
            .map_err(|e| open_error(expenses_path, e))?;

        // Wrap tokio file in a compatibility layer for csv-async
        let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
        let mut reader = AsyncExpenseReader::new(compat_file, group, self.ledger.share_scale);

        let mut total = 0usize;
        loop {
            let batch = reader.read_batch(self.batches.batch_size).await?;
            if batch.is_empty() {
                break;
            }

            total += batch.len();
            tracing::debug!(batch = batch.len(), total, "aggregating batch");
            aggregator.process_batch(batch).await?;
        }

        tracing::info!(expenses = total, "loaded expense log");
        Ok(accumulator.snapshot())
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn config(&self) -> &LedgerConfig {
        &self.ledger
    }

    /// Aggregate the expense log on a dedicated tokio runtime
    ///
    /// # Errors
    ///
    /// Fails if the runtime cannot be built, in addition to the read and
    /// validation errors of the sequential strategy.
    fn compute_balances(
        &self,
        group: &Group,
        expenses_path: &Path,
    ) -> Result<Balances, LedgerError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.batches.max_concurrent_batches)
            .build()
            .map_err(|e| LedgerError::runtime(format!("Failed to create tokio runtime: {}", e)))?;

        runtime.block_on(self.aggregate(Arc::new(group.clone()), expenses_path))
    }
}
