//! Execution strategy module
//!
//! This module defines the Strategy pattern for running a script against a
//! fresh ledger. The harness picks a strategy at runtime:
//!
//! - `sequential` applies operations in program order on the calling thread
//! - `concurrent` gives every operation its own execution unit and waits for all
//!
//! Both produce a [`RunSummary`] with one report per operation, in script
//! order, and the final balances.

use crate::cli::StrategyType;
use crate::core::DEFAULT_LOCK_TIMEOUT;
use crate::types::{AccountId, LedgerError, OperationReport, Script};
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{info, warn};

pub mod concurrent;
pub mod sequential;

pub use concurrent::ConcurrentStrategy;
pub use sequential::SequentialStrategy;

/// Configuration shared by the execution strategies
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    /// Bound on each lock wait inside a transfer
    pub lock_timeout: Duration,
    /// Maximum number of worker threads (concurrent strategy only)
    pub workers: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            workers: num_cpus::get(),
        }
    }
}

impl RunConfig {
    /// Create a RunConfig with custom values
    ///
    /// Zero values fall back to the defaults with a warning.
    pub fn new(lock_timeout: Duration, workers: usize) -> Self {
        let default = Self::default();

        let lock_timeout = if lock_timeout.is_zero() {
            warn!(
                "Invalid lock timeout ({:?}), using default ({:?})",
                lock_timeout, default.lock_timeout
            );
            default.lock_timeout
        } else {
            lock_timeout
        };

        let workers = if workers == 0 {
            warn!(
                "Invalid worker count ({}), using default ({})",
                workers, default.workers
            );
            default.workers
        } else {
            workers
        };

        Self {
            lock_timeout,
            workers,
        }
    }
}

/// Result of running a script
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// One report per operation, in script order
    pub reports: Vec<OperationReport>,
    /// Final balances sorted by account identity
    pub balances: Vec<(AccountId, Decimal)>,
    /// Initial balances as opened by the script
    pub initial_balances: Vec<(AccountId, Decimal)>,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.count(|report| report.is_success())
    }

    pub fn insufficient_funds(&self) -> usize {
        self.count(|report| matches!(report.error(), Some(LedgerError::InsufficientFunds { .. })))
    }

    pub fn lock_timeouts(&self) -> usize {
        self.count(|report| matches!(report.error(), Some(LedgerError::LockTimeout { .. })))
    }

    /// Operations refused before touching a balance (bad amount, self-transfer, overflow)
    pub fn rejected(&self) -> usize {
        self.count(|report| {
            report.error().is_some_and(|error| {
                error.is_domain_outcome()
                    && !matches!(
                        error,
                        LedgerError::InsufficientFunds { .. } | LedgerError::LockTimeout { .. }
                    )
            })
        })
    }

    /// Initial balance of one account
    pub fn initial_balance(&self, account: AccountId) -> Option<Decimal> {
        self.initial_balances
            .iter()
            .find(|(id, _)| *id == account)
            .map(|(_, balance)| *balance)
    }

    /// Sum of the initial balances
    pub fn initial_total(&self) -> Decimal {
        self.initial_balances
            .iter()
            .map(|(_, balance)| *balance)
            .sum()
    }

    /// Final balance of one account
    pub fn balance(&self, account: AccountId) -> Option<Decimal> {
        self.balances
            .iter()
            .find(|(id, _)| *id == account)
            .map(|(_, balance)| *balance)
    }

    /// Sum of the final balances
    pub fn final_total(&self) -> Decimal {
        self.balances.iter().map(|(_, balance)| *balance).sum()
    }

    /// Net change applied to `account` by the successful operations
    pub fn successful_delta(&self, account: AccountId) -> Decimal {
        self.reports
            .iter()
            .filter_map(OperationReport::receipt)
            .map(|receipt| receipt.delta(account))
            .sum()
    }

    /// Whether every account ended at its initial balance plus its successful deltas
    ///
    /// Checked per account, so a reported transfer that was never applied
    /// fails even though its two deltas cancel in the total.
    pub fn is_conserved(&self) -> bool {
        self.balances.len() == self.initial_balances.len()
            && self.balances.iter().all(|&(id, balance)| {
                self.initial_balance(id)
                    .is_some_and(|initial| balance == initial + self.successful_delta(id))
            })
    }

    /// Log a one-line summary of the run
    pub fn log(&self) {
        info!(
            operations = self.reports.len(),
            succeeded = self.succeeded(),
            insufficient_funds = self.insufficient_funds(),
            lock_timeouts = self.lock_timeouts(),
            rejected = self.rejected(),
            "All operations completed"
        );
    }

    fn count<P>(&self, predicate: P) -> usize
    where
        P: Fn(&OperationReport) -> bool,
    {
        self.reports.iter().filter(|report| predicate(report)).count()
    }
}

/// Execution strategy trait
///
/// A strategy builds a fresh ledger from the script, issues every operation,
/// waits for all of them to finish and reads the final balances.
pub trait ExecutionStrategy: Send + Sync {
    /// Run a script
    ///
    /// # Errors
    ///
    /// Returns an error if the script names duplicate or unknown accounts, or
    /// if a worker fails. Domain outcomes of individual operations are
    /// carried in the summary's reports.
    fn run(&self, script: &Script) -> Result<RunSummary, LedgerError>;
}

/// Create an execution strategy based on the specified strategy type
pub fn create_strategy(
    strategy_type: StrategyType,
    config: RunConfig,
) -> Box<dyn ExecutionStrategy> {
    match strategy_type {
        StrategyType::Sequential => Box::new(SequentialStrategy::new(config)),
        StrategyType::Concurrent => Box::new(ConcurrentStrategy::new(config)),
    }
}
