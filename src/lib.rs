//! Concurrent Ledger Library
//! # Overview
//!
//! This library models concurrent mutation of shared accounts under mutual
//! exclusion: deposits, withdrawals and two-account transfers issued by
//! independent workers against a small set of shared accounts.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, Operation, Receipt, LedgerError, etc.)
//! - [`core`] - The locking discipline:
//!   - [`core::operations`] - Deposit, withdraw and transfer as critical sections
//!   - [`core::dual_lock`] - Ordered, bounded acquisition of two account locks
//!   - [`core::timing`] - Per-call duration measurement
//!   - [`core::ledger`] - Caller-side registry of shared accounts
//! - [`strategy`] - Sequential and concurrent execution of a script
//! - [`io`] - CSV script input and balance output
//! - [`cli`] - CLI arguments parsing
//!
//! # Guarantees
//!
//! - At most one worker mutates an account's balance at a time
//! - Balances never go negative; a debit that would is reported as
//!   `InsufficientFunds` and changes nothing
//! - Transfers are all-or-nothing and lock accounts in ascending id order with
//!   a bounded wait per lock, so they always return; under contention they may
//!   report `LockTimeout`
//! - Every call reports its own wall-clock duration
//!
//! ```
//! use concurrent_ledger::Account;
//! use rust_decimal::Decimal;
//!
//! let a = Account::new(1, Decimal::from(1000));
//! let b = Account::new(2, Decimal::from(1000));
//!
//! assert!(a.transfer(&b, Decimal::from(300)).is_success());
//! assert!(b.withdraw(Decimal::from(2000)).error().is_some());
//! assert_eq!(a.balance() + b.balance(), Decimal::from(2000));
//! ```

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use self::core::{Ledger, DEFAULT_LOCK_TIMEOUT};
pub use io::{read_script, write_balances_csv};
pub use types::{
    Account, AccountId, LedgerError, Operation, OperationKind, OperationReport, Receipt, Script,
};
