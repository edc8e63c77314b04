//! Account ledger core
//!
//! This module contains the locking discipline for concurrent balance mutation:
//! - `operations` - Deposit, withdraw and transfer as critical sections on `Account`
//! - `dual_lock` - Ordered, bounded acquisition of two account locks for transfers
//! - `timing` - Per-call duration measurement
//! - `ledger` - Caller-side registry of shared accounts

pub mod dual_lock;
pub mod ledger;
pub mod operations;
pub mod timing;

pub use dual_lock::{acquire_pair, read_pair, PairGuard, DEFAULT_LOCK_TIMEOUT};
pub use ledger::Ledger;
pub use timing::OperationTimer;
