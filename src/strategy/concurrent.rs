//! Concurrent execution strategy
//!
//! Every operation gets its own execution unit on a tokio multi-threaded
//! runtime's blocking pool (`spawn_blocking`), since the account operations
//! wait on OS-level locks. All units are spawned before any is awaited, then
//! joined together with `futures::future::join_all`.
//!
//! The scheduler decides in which order operations reach each account, so
//! which withdrawals or transfers report `InsufficientFunds` (and, under
//! heavy contention, `LockTimeout`) can vary between runs. Conservation of
//! the total holds on every run.
//!
//! ```text
//! ConcurrentStrategy
//!     ├── RunConfig (lock_timeout, workers)
//!     ├── Arc<Ledger> (shared accounts)
//!     └── one spawn_blocking unit per operation
//! ```

use crate::core::Ledger;
use crate::strategy::{ExecutionStrategy, RunConfig, RunSummary};
use crate::types::{LedgerError, Script};
use futures::future::join_all;
use std::sync::Arc;
use tracing::debug;

/// Concurrent execution strategy
#[derive(Debug, Clone)]
pub struct ConcurrentStrategy {
    config: RunConfig,
}

impl ConcurrentStrategy {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }
}

impl ExecutionStrategy for ConcurrentStrategy {
    fn run(&self, script: &Script) -> Result<RunSummary, LedgerError> {
        let ledger = Arc::new(Ledger::from_script(script, self.config.lock_timeout)?);

        // Blocking pool sized by `workers`; async workers only await join handles
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(self.config.workers)
            .thread_name("ledger-worker")
            .build()
            .map_err(|e| LedgerError::WorkerFailed {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        let reports = runtime.block_on(async {
            let handles: Vec<_> = script
                .operations
                .iter()
                .copied()
                .map(|operation| {
                    let ledger = Arc::clone(&ledger);
                    tokio::task::spawn_blocking(move || ledger.execute(&operation))
                })
                .collect();

            debug!(units = handles.len(), "spawned all execution units");

            join_all(handles)
                .await
                .into_iter()
                .map(|joined| {
                    joined.map_err(|e| LedgerError::WorkerFailed {
                        message: e.to_string(),
                    })?
                })
                .collect::<Result<Vec<_>, _>>()
        })?;

        Ok(RunSummary {
            reports,
            balances: ledger.balances(),
            initial_balances: script.accounts.clone(),
        })
    }
}
