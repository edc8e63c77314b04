//! Dual-lock coordinator
//!
//! Acquires the locks of two distinct accounts for a transfer without risking
//! a circular wait. Two rules make this safe:
//!
//! 1. **Global order**: locks are always requested lower account id first, so
//!    transfers between the same pair in opposite directions contend on the
//!    same lock first instead of each holding one and waiting for the other.
//! 2. **Bounded wait**: each acquisition gives up after a timeout. A timed-out
//!    attempt reports [`LedgerError::LockTimeout`] and releases whatever it did
//!    acquire, so every call returns even under heavy contention.
//!
//! Under contention a transfer may time out although no deadlock was
//! imminent. That is reported like any other outcome.

use crate::types::{Account, AccountId, LedgerError};
use parking_lot::MutexGuard;
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::trace;

/// Bound on each individual lock acquisition in a transfer
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(100);

/// Both balances of a transfer, locked
///
/// Dropping the guard releases both locks.
#[derive(Debug)]
pub struct PairGuard<'a> {
    source_id: AccountId,
    target_id: AccountId,
    source: MutexGuard<'a, Decimal>,
    target: MutexGuard<'a, Decimal>,
}

impl PairGuard<'_> {
    pub fn source_id(&self) -> AccountId {
        self.source_id
    }

    pub fn target_id(&self) -> AccountId {
        self.target_id
    }

    pub fn source(&mut self) -> &mut Decimal {
        &mut self.source
    }

    pub fn target(&mut self) -> &mut Decimal {
        &mut self.target
    }

    pub fn balances(&self) -> (Decimal, Decimal) {
        (*self.source, *self.target)
    }
}

/// Order two accounts by identity: `(first, second)` with `first.id() < second.id()`
///
/// Returns `SelfTransfer` when both sides share an identity, since locking
/// the same mutex twice would block the caller against itself.
pub fn lock_order<'a>(
    source: &'a Account,
    target: &'a Account,
) -> Result<(&'a Account, &'a Account), LedgerError> {
    if source.id() == target.id() {
        return Err(LedgerError::self_transfer(source.id()));
    }

    if source.id() < target.id() {
        Ok((source, target))
    } else {
        Ok((target, source))
    }
}

/// Lock `source` and `target` in global order, each with a bounded wait
///
/// Both acquisitions are attempted even when the first one times out, and
/// the error records which of them succeeded. Any lock that was granted is
/// released before this returns an error.
pub fn acquire_pair<'a>(
    source: &'a Account,
    target: &'a Account,
    timeout: Duration,
) -> Result<PairGuard<'a>, LedgerError> {
    let (first, second) = lock_order(source, target)?;

    let first_guard = first.balance.try_lock_for(timeout);
    trace!(
        account = first.id(),
        acquired = first_guard.is_some(),
        "first lock attempt"
    );

    let second_guard = second.balance.try_lock_for(timeout);
    trace!(
        account = second.id(),
        acquired = second_guard.is_some(),
        "second lock attempt"
    );

    match (first_guard, second_guard) {
        (Some(first_guard), Some(second_guard)) => {
            let (source_guard, target_guard) = if first.id() == source.id() {
                (first_guard, second_guard)
            } else {
                (second_guard, first_guard)
            };

            Ok(PairGuard {
                source_id: source.id(),
                target_id: target.id(),
                source: source_guard,
                target: target_guard,
            })
        }
        (first_guard, second_guard) => Err(LedgerError::lock_timeout(
            source.id(),
            target.id(),
            first_guard.is_some(),
            second_guard.is_some(),
        )),
    }
}

/// Read two balances as one consistent pair
///
/// Uses the same ordered, bounded acquisition as a transfer, so the pair
/// never reflects a half-applied transfer.
pub fn read_pair(
    a: &Account,
    b: &Account,
    timeout: Duration,
) -> Result<(Decimal, Decimal), LedgerError> {
    let guard = acquire_pair(a, b, timeout)?;
    Ok(guard.balances())
}
