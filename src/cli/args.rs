use crate::config::{LedgerConfig, DEFAULT_SHARE_SCALE, DEFAULT_TOLERANCE};
use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Compute group balances and settle-up transfers from shared expenses
#[derive(Parser, Debug)]
#[command(name = "vaquita-ledger")]
#[command(about = "Compute group balances and settle-up transfers from shared expenses", long_about = None)]
pub struct CliArgs {
    /// CSV file listing the group's members
    #[arg(value_name = "MEMBERS", help = "Path to the members CSV file")]
    pub members_file: PathBuf,

    /// CSV file with the group's expenses
    #[arg(value_name = "EXPENSES", help = "Path to the expenses CSV file")]
    pub expenses_file: PathBuf,

    /// Which report to write to stdout
    #[arg(
        long = "report",
        value_name = "REPORT",
        default_value = "settlement",
        help = "Report to print: 'balances' or 'settlement'"
    )]
    pub report: ReportKind,

    /// Processing strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Processing strategy: 'sync' for sequential or 'async' for batched parallel aggregation"
    )]
    pub strategy: StrategyType,

    /// Rounding tolerance
    #[arg(
        long = "tolerance",
        value_name = "AMOUNT",
        help = "Rounding tolerance for splits and balances (default: 0.01)"
    )]
    pub tolerance: Option<Decimal>,

    /// Decimal places for generated shares and output amounts
    #[arg(
        long = "scale",
        value_name = "DIGITS",
        value_parser = clap::value_parser!(u32).range(0..=28),
        help = "Decimal places for equal-split shares and output, 0 to 28 (default: 2)"
    )]
    pub scale: Option<u32>,

    /// Number of expenses per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of expenses per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of concurrent aggregation tasks (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of concurrent aggregation tasks (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Emit logs as JSON lines
    #[arg(long = "json-logs", help = "Write logs to stderr as JSON lines")]
    pub json_logs: bool,
}

/// Available processing strategies
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Reports the CLI can print
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Per-member paid, owed and net amounts
    Balances,
    /// Transfers that settle every balance
    Settlement,
}

impl CliArgs {
    /// Build the ledger's numeric policy from CLI arguments
    pub fn to_ledger_config(&self) -> LedgerConfig {
        LedgerConfig::new(
            self.tolerance.unwrap_or(DEFAULT_TOLERANCE),
            self.scale.unwrap_or(DEFAULT_SHARE_SCALE),
        )
    }

    /// Create a BatchConfig from CLI arguments
    ///
    /// Falls back to defaults for missing values; zero values are replaced by
    /// defaults with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }
}
