//! Asynchronous implementations of core components
//!
//! This module provides thread-safe, concurrent counterparts of the ledger
//! aggregator using DashMap for locking.
//!
//! # Architecture
//!
//! - **BalanceAccumulator**: Thread-safe running balances using DashMap
//! - **BatchAggregator**: Validates and applies expense batches across tokio tasks
//!
//! # Thread Safety
//!
//! - Expenses touching different members are applied in parallel
//! - Updates to the same member are serialized per entry
//! - No global locks; the result never depends on scheduling

pub mod accumulator;
pub mod batch_aggregator;

pub use accumulator::BalanceAccumulator;
pub use batch_aggregator::BatchAggregator;
