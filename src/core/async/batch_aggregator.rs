//! Batch aggregation with chunk-based parallelism
//!
//! This module provides the `BatchAggregator` struct, which validates and
//! applies a batch of expenses across several tokio tasks.
//!
//! # Design
//!
//! Unlike ordered transaction processing, aggregation does not care about the
//! order expenses are applied in. A batch is therefore cut into contiguous
//! chunks, one task per chunk, all feeding the same `BalanceAccumulator`.
//!
//! Errors must still be deterministic. Duplicate ids are checked sequentially
//! before any task starts, each task stops at its first failing expense and
//! reports the expense's position, and the lowest position wins. That is the
//! same error the sequential aggregator would report.
//!
//! # Architecture
//!
//! ```text
//! BatchAggregator
//!     ├── BalanceAggregator        (validation and numeric policy)
//!     ├── Arc<Group>               (roster shared by all tasks)
//!     └── Arc<BalanceAccumulator>  (thread-safe running balances)
//! ```

use std::sync::Arc;

use super::BalanceAccumulator;
use crate::core::aggregator::BalanceAggregator;
use crate::types::{Expense, Group, LedgerError};

/// An expense tagged with its position in the batch
type Positioned = (usize, Expense);

/// Failure tagged with the position of the expense that caused it
type PositionedError = (usize, LedgerError);

/// Parallel validator and accumulator for expense batches
#[derive(Debug, Clone)]
pub struct BatchAggregator {
    aggregator: BalanceAggregator,
    group: Arc<Group>,
    accumulator: Arc<BalanceAccumulator>,
    max_tasks: usize,
}

impl BatchAggregator {
    /// Create a new BatchAggregator
    ///
    /// # Arguments
    ///
    /// * `aggregator` - Validation rules and tolerance
    /// * `group` - Roster every expense is checked against
    /// * `accumulator` - Shared running balances
    /// * `max_tasks` - Upper bound on tasks spawned per batch (at least 1)
    pub fn new(
        aggregator: BalanceAggregator,
        group: Arc<Group>,
        accumulator: Arc<BalanceAccumulator>,
        max_tasks: usize,
    ) -> Self {
        Self {
            aggregator,
            group,
            accumulator,
            max_tasks: max_tasks.max(1),
        }
    }

    /// Cut a batch into at most `max_tasks` contiguous chunks
    ///
    /// # Guarantees
    ///
    /// - Each expense appears in exactly one chunk
    /// - Chunks keep input order and carry each expense's batch position
    /// - No chunk is empty
    pub fn partition(&self, batch: Vec<Expense>) -> Vec<Vec<Positioned>> {
        if batch.is_empty() {
            return Vec::new();
        }

        let chunk_len = batch.len().div_ceil(self.max_tasks);
        let mut chunks: Vec<Vec<Positioned>> = Vec::with_capacity(self.max_tasks);

        for (position, expense) in batch.into_iter().enumerate() {
            if position % chunk_len == 0 {
                chunks.push(Vec::with_capacity(chunk_len));
            }
            if let Some(chunk) = chunks.last_mut() {
                chunk.push((position, expense));
            }
        }

        chunks
    }

    /// Validate and apply one chunk, stopping at the first failure
    pub fn process_chunk(&self, chunk: Vec<Positioned>) -> Result<(), PositionedError> {
        for (position, expense) in chunk {
            let split = self
                .aggregator
                .validate(&self.group, &expense)
                .map_err(|e| (position, e))?;
            self.accumulator
                .apply(&expense.payer, expense.amount, &split)
                .map_err(|e| (position, e))?;
        }
        Ok(())
    }

    /// Validate and apply a batch of expenses
    ///
    /// This method processes a batch by:
    /// 1. Recording expense ids in order, noting the first duplicate
    /// 2. Partitioning the batch into contiguous chunks
    /// 3. Spawning one tokio task per chunk
    /// 4. Waiting for all tasks and keeping the earliest failure
    ///
    /// # Errors
    ///
    /// Returns the error of the earliest failing expense in the batch. On
    /// error the accumulator may hold a partial result and must be discarded.
    pub async fn process_batch(&self, batch: Vec<Expense>) -> Result<(), LedgerError> {
        let mut first_error: Option<PositionedError> = None;

        let mut accepted = Vec::with_capacity(batch.len());
        for (position, expense) in batch.into_iter().enumerate() {
            if !self.accumulator.record(expense.id) {
                first_error = Some((
                    position,
                    LedgerError::DuplicateExpense {
                        expense: expense.id,
                    },
                ));
                break;
            }
            accepted.push(expense);
        }

        let mut tasks = Vec::new();
        for chunk in self.partition(accepted) {
            let aggregator = self.clone();
            tasks.push(tokio::spawn(async move { aggregator.process_chunk(chunk) }));
        }

        for task in tasks {
            match task.await {
                Ok(Ok(())) => {}
                Ok(Err((position, error))) => {
                    let earlier = match &first_error {
                        Some((first, _)) => position < *first,
                        None => true,
                    };
                    if earlier {
                        first_error = Some((position, error));
                    }
                }
                Err(e) => {
                    return Err(LedgerError::runtime(format!("aggregation task failed: {}", e)));
                }
            }
        }

        match first_error {
            Some((_, error)) => Err(error),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MemberId, Split};
    use rust_decimal::Decimal;

    fn group() -> Arc<Group> {
        Arc::new(Group::new(["A", "B", "C"]).unwrap())
    }

    fn expense(id: u32, payer: &str, amount: i64, shares: &[(&str, i64)]) -> Expense {
        let split: Split = shares
            .iter()
            .map(|(m, s)| (MemberId::from(*m), Decimal::new(*s, 0)))
            .collect();
        Expense::new(id, payer, Decimal::new(amount, 0), split)
    }

    fn batch_aggregator(max_tasks: usize) -> (BatchAggregator, Arc<BalanceAccumulator>) {
        let group = group();
        let accumulator = Arc::new(BalanceAccumulator::new(&group));
        let aggregator = BatchAggregator::new(
            BalanceAggregator::default(),
            group,
            Arc::clone(&accumulator),
            max_tasks,
        );
        (aggregator, accumulator)
    }

    #[test]
    fn test_partition_keeps_every_expense_once() {
        let (aggregator, _) = batch_aggregator(3);
        let batch: Vec<Expense> = (0..7).map(|i| expense(i, "A", 1, &[("B", 1)])).collect();

        let chunks = aggregator.partition(batch);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|chunk| !chunk.is_empty()));

        let positions: Vec<usize> = chunks.iter().flatten().map(|(p, _)| *p).collect();
        assert_eq!(positions, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn test_partition_small_batch() {
        let (aggregator, _) = batch_aggregator(8);
        let batch = vec![expense(1, "A", 1, &[("B", 1)]), expense(2, "B", 1, &[("A", 1)])];
        let chunks = aggregator.partition(batch);
        assert_eq!(chunks.len(), 2);
        assert!(aggregator.partition(Vec::new()).is_empty());
    }

    #[test]
    fn test_zero_tasks_falls_back_to_one() {
        let (aggregator, _) = batch_aggregator(0);
        let batch = vec![expense(1, "A", 1, &[("B", 1)]), expense(2, "B", 1, &[("A", 1)])];
        assert_eq!(aggregator.partition(batch).len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_process_batch_matches_sequential() {
        let (aggregator, accumulator) = batch_aggregator(4);
        let batch = vec![
            expense(1, "A", 90, &[("A", 30), ("B", 30), ("C", 30)]),
            expense(2, "B", 40, &[("A", 20), ("C", 20)]),
            expense(3, "C", 10, &[("B", 10)]),
            expense(4, "A", 6, &[("B", 3), ("C", 3)]),
            expense(5, "C", 12, &[("A", 4), ("B", 4), ("C", 4)]),
        ];

        let sequential = BalanceAggregator::default()
            .compute_balances(&group(), &batch)
            .unwrap();

        aggregator.process_batch(batch).await.unwrap();
        assert_eq!(accumulator.snapshot(), sequential);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_process_batch_reports_earliest_error() {
        let (aggregator, _) = batch_aggregator(4);
        let batch = vec![
            expense(1, "A", 10, &[("B", 10)]),
            expense(2, "A", 10, &[("Z", 10)]),
            expense(3, "A", 10, &[("B", 10)]),
            expense(4, "A", 10, &[("B", 9)]),
        ];

        let result = aggregator.process_batch(batch).await;
        assert_eq!(
            result,
            Err(LedgerError::UnknownMember {
                expense: 2,
                member: "Z".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_process_batch_detects_duplicates_across_batches() {
        let (aggregator, _) = batch_aggregator(2);
        aggregator
            .process_batch(vec![expense(1, "A", 10, &[("B", 10)])])
            .await
            .unwrap();

        let result = aggregator
            .process_batch(vec![expense(2, "A", 10, &[("B", 10)]), expense(1, "B", 5, &[("A", 5)])])
            .await;
        assert_eq!(result, Err(LedgerError::DuplicateExpense { expense: 1 }));
    }

    #[tokio::test]
    async fn test_validation_error_before_duplicate_wins() {
        let (aggregator, _) = batch_aggregator(2);
        let batch = vec![
            expense(1, "A", 10, &[("B", 10)]),
            expense(2, "A", 10, &[("B", 1)]),
            expense(1, "A", 10, &[("B", 10)]),
        ];
        let result = aggregator.process_batch(batch).await;
        assert!(matches!(result, Err(LedgerError::InvalidSplit { expense: 2, .. })));
    }
}
