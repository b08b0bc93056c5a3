//! Benchmark suite for aggregation, planning and processing strategies
//!
//! Uses the divan benchmarking framework. Ledgers are generated in memory, so
//! no fixture files are needed; the strategy benchmarks write them to a
//! temporary directory first.
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//! ```

use rust_decimal::Decimal;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use vaquita_ledger::cli::{ReportKind, StrategyType};
use vaquita_ledger::config::LedgerConfig;
use vaquita_ledger::strategy::{create_strategy, BatchConfig};
use vaquita_ledger::{
    compute_balances, plan_settlement, Balances, Expense, Group, MemberId,
};

const MEMBERS: usize = 50;

fn main() {
    divan::main();
}

fn member(index: usize) -> MemberId {
    MemberId::new(format!("member{:03}", index))
}

fn group() -> Group {
    Group::new((0..MEMBERS).map(member)).expect("valid roster")
}

/// Deterministic pseudo-random ledger: payer and participants rotate through
/// the roster, amounts cycle through odd cent values
fn expenses(count: usize) -> Vec<Expense> {
    (0..count)
        .map(|i| {
            let payer = member(i % MEMBERS);
            let participants = (0..(i % 7) + 2).map(|k| member((i * 13 + k * 7) % MEMBERS));
            let amount = Decimal::new(((i * 7919) % 100_000 + 1) as i64, 2);
            Expense::equal(i as u32 + 1, payer, amount, participants, 2).expect("valid expense")
        })
        .collect()
}

struct LedgerFiles {
    _dir: TempDir,
    members: PathBuf,
    expenses: PathBuf,
}

fn ledger_files(count: usize) -> LedgerFiles {
    let dir = TempDir::new().expect("temp dir");

    let mut members = String::from("member\n");
    for i in 0..MEMBERS {
        let _ = writeln!(members, "{}", member(i));
    }

    let mut rows = String::from("expense,payer,amount,split,description\n");
    for expense in expenses(count) {
        let split: Vec<String> = expense.participants().map(|m| m.to_string()).collect();
        let _ = writeln!(
            rows,
            "{},{},{},{},generated",
            expense.id,
            expense.payer,
            expense.amount,
            split.join(";")
        );
    }

    let members_path = dir.path().join("members.csv");
    let expenses_path = dir.path().join("expenses.csv");
    fs::write(&members_path, members).expect("write members");
    fs::write(&expenses_path, rows).expect("write expenses");

    LedgerFiles {
        _dir: dir,
        members: members_path,
        expenses: expenses_path,
    }
}

/// Aggregate an in-memory expense log
#[divan::bench(args = [100, 1_000, 100_000])]
fn aggregate_balances(bencher: divan::Bencher, count: usize) {
    let group = group();
    let expenses = expenses(count);

    bencher.bench_local(|| compute_balances(&group, &expenses).expect("aggregation failed"));
}

/// Plan a settlement over a roster of `count` members
#[divan::bench(args = [10, 100, 1_000])]
fn plan_settlement_members(bencher: divan::Bencher, count: usize) {
    let half = count / 2;
    let balances = Balances::from_nets((0..count).map(|i| {
        let cents = ((i * 31) % 997 + 1) as i64;
        let net = if i < half { cents } else { -cents };
        (member(i), Decimal::new(net, 2))
    }));
    // Push the residual onto the first member so the ledger balances
    let residual = balances.total_net().unwrap_or_default();
    let balances = Balances::from_nets(balances.iter().map(|balance| {
        if balance.member == member(0) {
            (balance.member.clone(), balance.net() - residual)
        } else {
            (balance.member.clone(), balance.net())
        }
    }));

    bencher.bench_local(|| plan_settlement(&balances).expect("planning failed"));
}

/// Benchmark synchronous processing strategy end to end
#[divan::bench(args = [1_000, 100_000])]
fn sync_strategy(bencher: divan::Bencher, count: usize) {
    let files = ledger_files(count);
    let strategy = create_strategy(StrategyType::Sync, LedgerConfig::default(), None);

    bencher.bench_local(|| {
        let mut output = Vec::new();
        strategy
            .process(&files.members, &files.expenses, ReportKind::Settlement, &mut output)
            .expect("Processing failed");
        output
    });
}

/// Benchmark asynchronous processing strategy end to end
#[divan::bench(args = [1_000, 100_000])]
fn async_strategy(bencher: divan::Bencher, count: usize) {
    let files = ledger_files(count);
    let strategy = create_strategy(
        StrategyType::Async,
        LedgerConfig::default(),
        Some(BatchConfig::default()),
    );

    bencher.bench_local(|| {
        let mut output = Vec::new();
        strategy
            .process(&files.members, &files.expenses, ReportKind::Settlement, &mut output)
            .expect("Processing failed");
        output
    });
}
