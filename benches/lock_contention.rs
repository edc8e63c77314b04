//! Benchmark suite for lock contention
//!
//! Compares the cost of the account operations with and without contention,
//! and the two execution strategies on the reference scenario, using the
//! divan benchmarking framework.
//!
//! ```bash
//! cargo bench
//! ```

use concurrent_ledger::cli::StrategyType;
use concurrent_ledger::strategy::{create_strategy, RunConfig};
use concurrent_ledger::{Account, Script};
use rust_decimal::Decimal;
use std::thread;

fn main() {
    divan::main();
}

/// Uncontended deposit: one lock, no waiting
#[divan::bench]
fn deposit_uncontended(bencher: divan::Bencher) {
    let account = Account::new(1, Decimal::ZERO);

    bencher.bench_local(|| account.deposit(Decimal::ONE));
}

/// Uncontended transfer: two ordered bounded acquisitions
#[divan::bench]
fn transfer_uncontended(bencher: divan::Bencher) {
    let a = Account::new(1, Decimal::from(1_000_000_000));
    let b = Account::new(2, Decimal::ZERO);

    bencher.bench_local(|| a.transfer(&b, Decimal::ONE));
}

/// Opposing transfers between the same pair from several threads
#[divan::bench(args = [2, 4, 8])]
fn opposing_transfers(threads: usize) {
    let a = Account::new(1, Decimal::from(10_000));
    let b = Account::new(2, Decimal::from(10_000));

    thread::scope(|scope| {
        for t in 0..threads {
            let (a, b) = (&a, &b);
            scope.spawn(move || {
                for _ in 0..100 {
                    if t % 2 == 0 {
                        a.transfer(b, Decimal::ONE);
                    } else {
                        b.transfer(a, Decimal::ONE);
                    }
                }
            });
        }
    });
}

/// Reference scenario in program order
#[divan::bench]
fn sequential_reference() {
    let strategy = create_strategy(StrategyType::Sequential, RunConfig::default());

    strategy
        .run(&Script::reference())
        .expect("Processing failed");
}

/// Reference scenario with one worker per operation
#[divan::bench]
fn concurrent_reference() {
    let strategy = create_strategy(StrategyType::Concurrent, RunConfig::default());

    strategy
        .run(&Script::reference())
        .expect("Processing failed");
}
