//! Sequential execution strategy
//!
//! Applies a script's operations one at a time, in program order, on the
//! calling thread. With no contention every transfer acquires its locks
//! immediately, so the outcome is fully deterministic. This is the reference
//! the concurrent strategy is compared against.

use crate::core::Ledger;
use crate::strategy::{ExecutionStrategy, RunConfig, RunSummary};
use crate::types::{LedgerError, Script};

/// Sequential execution strategy
#[derive(Debug, Clone)]
pub struct SequentialStrategy {
    config: RunConfig,
}

impl SequentialStrategy {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }
}

impl ExecutionStrategy for SequentialStrategy {
    fn run(&self, script: &Script) -> Result<RunSummary, LedgerError> {
        let ledger = Ledger::from_script(script, self.config.lock_timeout)?;

        let reports = script
            .operations
            .iter()
            .map(|operation| ledger.execute(operation))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RunSummary {
            reports,
            balances: ledger.balances(),
            initial_balances: script.accounts.clone(),
        })
    }
}
