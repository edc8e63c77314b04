//! Thread-safe account registry
//!
//! This module provides the `Ledger` struct, the caller-side registry that owns
//! the shared `Account` instances of a run and resolves operation requests to
//! them.
//!
//! # Design
//!
//! Accounts are stored as `Arc<Account>` in a `DashMap` keyed by identity.
//! The map only guards registration and lookup; balance mutation is protected
//! by each account's own lock, so looking up an account never blocks an
//! operation in progress on it.
//!
//! Identities are unique: opening an existing identity fails, which keeps the
//! id-based lock order of transfers a total order.

use crate::core::dual_lock::DEFAULT_LOCK_TIMEOUT;
use crate::types::{Account, AccountId, LedgerError, Operation, OperationReport, Script};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

/// Registry of shared accounts
#[derive(Debug)]
pub struct Ledger {
    accounts: DashMap<AccountId, Arc<Account>>,

    /// Bound on each lock wait inside a transfer
    lock_timeout: Duration,
}

impl Ledger {
    /// Create an empty ledger whose transfers wait at most `lock_timeout` per lock
    pub fn new(lock_timeout: Duration) -> Self {
        Self {
            accounts: DashMap::new(),
            lock_timeout,
        }
    }

    /// Build a ledger from a script's account list and check its operations
    ///
    /// # Errors
    ///
    /// - `DuplicateAccount` if the script opens an identity twice
    /// - `UnknownAccount` if an operation names an identity the script never opens
    pub fn from_script(script: &Script, lock_timeout: Duration) -> Result<Self, LedgerError> {
        let ledger = Self::new(lock_timeout);

        for &(id, initial_balance) in &script.accounts {
            ledger.open(id, initial_balance)?;
        }

        for operation in &script.operations {
            for id in operation.accounts() {
                ledger.get(id)?;
            }
        }

        Ok(ledger)
    }

    /// Register a new account
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAccount` if the identity is already registered.
    pub fn open(
        &self,
        id: AccountId,
        initial_balance: Decimal,
    ) -> Result<Arc<Account>, LedgerError> {
        match self.accounts.entry(id) {
            Entry::Occupied(_) => Err(LedgerError::DuplicateAccount { account: id }),
            Entry::Vacant(entry) => {
                let account = Arc::new(Account::new(id, initial_balance));
                entry.insert(Arc::clone(&account));
                Ok(account)
            }
        }
    }

    /// Look up a shared account by identity
    pub fn get(&self, id: AccountId) -> Result<Arc<Account>, LedgerError> {
        self.accounts
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(LedgerError::UnknownAccount { account: id })
    }

    /// Resolve and run one operation
    ///
    /// The map entry is released before the operation starts, so the only
    /// locks held during the call are the accounts' own.
    ///
    /// # Errors
    ///
    /// Returns `UnknownAccount` if the request names an unregistered account.
    /// Every other outcome, including domain failures, is in the report.
    pub fn execute(&self, operation: &Operation) -> Result<OperationReport, LedgerError> {
        let report = match *operation {
            Operation::Deposit { account, amount } => self.get(account)?.deposit(amount),
            Operation::Withdraw { account, amount } => self.get(account)?.withdraw(amount),
            Operation::Transfer { from, to, amount } => {
                let source = self.get(from)?;
                let target = self.get(to)?;
                source.transfer_with_timeout(&target, amount, self.lock_timeout)
            }
        };

        Ok(report)
    }

    /// Current balances sorted by identity
    ///
    /// Each balance is read under its own lock; call after all workers have
    /// finished for a consistent picture.
    pub fn balances(&self) -> Vec<(AccountId, Decimal)> {
        let mut balances: Vec<(AccountId, Decimal)> = self
            .accounts
            .iter()
            .map(|entry| (*entry.key(), entry.value().balance()))
            .collect();
        balances.sort_by_key(|(id, _)| *id);
        balances
    }

    /// Sum of all balances
    pub fn total(&self) -> Decimal {
        self.balances().into_iter().map(|(_, balance)| balance).sum()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(DEFAULT_LOCK_TIMEOUT)
    }
}
