//! Vaquita Ledger CLI
//!
//! Command-line interface for settling up a group's shared expenses.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- members.csv expenses.csv > settlement.csv
//! cargo run -- --report balances members.csv expenses.csv > balances.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 members.csv expenses.csv
//! RUST_LOG=info cargo run -- --json-logs members.csv expenses.csv
//! ```
//!
//! The program reads the group roster and its expense log, aggregates every
//! member's balance using the selected processing strategy, and writes either
//! the balances or the settlement transfers to stdout. Logs go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, invalid expense, etc.)

use vaquita_ledger::cli;
use vaquita_ledger::strategy;
use vaquita_ledger::telemetry;
use std::process;

fn main() {
    let args = cli::parse_args();
    telemetry::init(args.json_logs);

    let strategy = {
        let batch_config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy.clone(), args.to_ledger_config(), batch_config)
    };

    let mut output = std::io::stdout().lock();
    if let Err(e) = strategy.process(&args.members_file, &args.expenses_file, args.report, &mut output) {
        if e.is_internal() {
            tracing::error!(error = %e, "ledger consistency fault");
        }
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
