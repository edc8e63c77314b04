//! Account-related types for the concurrent ledger
//!
//! This module defines the Account structure: an immutable identity paired
//! with a balance cell that is only reachable through the account's own lock.
//! The operations that mutate the balance live in `core::operations`.

use parking_lot::Mutex;
use rust_decimal::Decimal;

/// Account identifier
///
/// Also the key of the global lock order used by transfers, so it must be
/// unique among live accounts.
pub type AccountId = u32;

/// A shared account
///
/// Holds an identity and a balance guarded by a per-account mutex. The
/// balance field is private; every read and write goes through the lock.
#[derive(Debug)]
pub struct Account {
    /// Immutable identity
    id: AccountId,

    /// Balance, guarded by this account's exclusion primitive
    ///
    /// `parking_lot::Mutex` supports both blocking acquisition (deposit,
    /// withdraw) and bounded acquisition via `try_lock_for` (transfer).
    pub(crate) balance: Mutex<Decimal>,
}

impl Account {
    /// Create a new account with the given identity and initial balance
    pub fn new(id: AccountId, initial_balance: Decimal) -> Self {
        Account {
            id,
            balance: Mutex::new(initial_balance),
        }
    }

    /// The account identity
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Read the current balance
    ///
    /// Blocks until the account's lock is available. The value is a snapshot;
    /// concurrent operations may change it as soon as this returns.
    pub fn balance(&self) -> Decimal {
        *self.balance.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_keeps_id_and_balance() {
        let account = Account::new(7, Decimal::new(100050, 2));

        assert_eq!(account.id(), 7);
        assert_eq!(account.balance(), Decimal::new(100050, 2));
    }

    #[test]
    fn test_balance_waits_for_lock_holder() {
        use std::sync::Arc;
        use std::thread;
        use std::time::Duration;

        let account = Arc::new(Account::new(1, Decimal::from(10)));
        let guard = account.balance.lock();

        let reader = {
            let account = Arc::clone(&account);
            thread::spawn(move || account.balance())
        };

        thread::sleep(Duration::from_millis(20));
        assert!(!reader.is_finished());
        drop(guard);

        assert_eq!(reader.join().unwrap(), Decimal::from(10));
    }
}
