//! Concurrent Ledger CLI
//!
//! Runs a script of deposits, withdrawals and transfers against shared
//! accounts and prints the final balances.
//!
//! # Usage
//!
//! ```bash
//! cargo run                                    # built-in scenario, concurrent
//! cargo run -- --strategy sequential           # built-in scenario, program order
//! cargo run -- script.csv > balances.csv
//! cargo run -- --lock-timeout-ms 50 --workers 4 script.csv
//! RUST_LOG=concurrent_ledger=debug cargo run   # include per-call durations
//! ```
//!
//! Operation outcomes and durations are logged to stderr; stdout carries only
//! the `account,balance` CSV.
//!
//! # Exit Codes
//!
//! - 0: Success (individual operations may still have failed)
//! - 1: Error (file not found, unreadable script, duplicate or unknown account)

use concurrent_ledger::{cli, io, strategy, LedgerError, Script};
use std::process;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn run(args: cli::CliArgs) -> Result<(), LedgerError> {
    let script = match &args.input_file {
        Some(path) => io::read_script(path)?,
        None => Script::reference(),
    };

    let strategy = strategy::create_strategy(args.strategy.clone(), args.to_run_config());
    let summary = strategy.run(&script)?;
    summary.log();

    let mut output = std::io::stdout();
    io::write_balances_csv(&summary.balances, &mut output)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("concurrent_ledger=info")),
        )
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    if let Err(e) = run(args) {
        error!("{}", e);
        process::exit(1);
    }
}
