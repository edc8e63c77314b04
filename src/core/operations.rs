//! Deposit, withdraw and transfer on shared accounts
//!
//! Each operation is a critical-section protocol over one or two accounts:
//!
//! - **Deposit** and **Withdraw** wait as long as needed for their account's
//!   lock, apply the change, and release it.
//! - **Transfer** takes both locks through the dual-lock coordinator with a
//!   bounded wait per lock, and mutates nothing unless both were granted.
//!
//! Every call returns an [`OperationReport`] carrying the outcome and the
//! duration of the call. Insufficient funds, lock timeouts and rejected
//! amounts are outcomes, not panics, and leave balances unchanged.

use crate::core::dual_lock::{acquire_pair, lock_order, DEFAULT_LOCK_TIMEOUT};
use crate::core::timing::timed;
use crate::types::{Account, LedgerError, OperationKind, OperationReport, Receipt};
use rust_decimal::Decimal;
use std::time::Duration;

fn ensure_positive(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::invalid_amount(amount));
    }
    Ok(())
}

impl Account {
    /// Credit `amount` to this account
    ///
    /// Blocks until the account's lock is available.
    ///
    /// # Errors
    ///
    /// Reports `InvalidAmount` for non-positive amounts and
    /// `ArithmeticOverflow` if the balance cannot hold the result.
    pub fn deposit(&self, amount: Decimal) -> OperationReport {
        timed(OperationKind::Deposit, || {
            ensure_positive(amount)?;

            let mut balance = self.balance.lock();
            let new_balance = balance
                .checked_add(amount)
                .ok_or_else(|| LedgerError::arithmetic_overflow("deposit", self.id()))?;
            *balance = new_balance;

            Ok(Receipt::Deposited {
                account: self.id(),
                amount,
                balance: new_balance,
            })
        })
    }

    /// Debit `amount` from this account if the balance covers it
    ///
    /// Blocks until the account's lock is available. The balance check and
    /// the debit happen under the same lock hold.
    ///
    /// # Errors
    ///
    /// Reports `InsufficientFunds` when `balance < amount` and
    /// `InvalidAmount` for non-positive amounts.
    pub fn withdraw(&self, amount: Decimal) -> OperationReport {
        timed(OperationKind::Withdraw, || {
            ensure_positive(amount)?;

            let mut balance = self.balance.lock();
            if *balance < amount {
                return Err(LedgerError::insufficient_funds(self.id(), *balance, amount));
            }
            *balance -= amount;

            Ok(Receipt::Withdrew {
                account: self.id(),
                amount,
                balance: *balance,
            })
        })
    }

    /// Move `amount` from this account to `target`
    ///
    /// Each of the two locks is awaited for at most [`DEFAULT_LOCK_TIMEOUT`].
    pub fn transfer(&self, target: &Account, amount: Decimal) -> OperationReport {
        self.transfer_with_timeout(target, amount, DEFAULT_LOCK_TIMEOUT)
    }

    /// Move `amount` from this account to `target`, bounding each lock wait by `timeout`
    ///
    /// The transfer is all-or-nothing: either both balances change or neither
    /// does.
    ///
    /// # Errors
    ///
    /// - `SelfTransfer` if `target` has this account's identity
    /// - `InvalidAmount` for non-positive amounts
    /// - `LockTimeout` if either lock was not granted in time
    /// - `InsufficientFunds` if this account's balance is below `amount`
    /// - `ArithmeticOverflow` if the target balance cannot hold the result
    pub fn transfer_with_timeout(
        &self,
        target: &Account,
        amount: Decimal,
        timeout: Duration,
    ) -> OperationReport {
        timed(OperationKind::Transfer, || {
            lock_order(self, target)?;
            ensure_positive(amount)?;

            let mut pair = acquire_pair(self, target, timeout)?;
            let (source_balance, target_balance) = pair.balances();

            if source_balance < amount {
                return Err(LedgerError::insufficient_funds(self.id(), source_balance, amount));
            }

            let new_target = target_balance
                .checked_add(amount)
                .ok_or_else(|| LedgerError::arithmetic_overflow("transfer", target.id()))?;
            let new_source = source_balance - amount;

            *pair.source() = new_source;
            *pair.target() = new_target;

            Ok(Receipt::Transferred {
                from: self.id(),
                to: target.id(),
                amount,
                from_balance: new_source,
                to_balance: new_target,
            })
        })
    }
}
