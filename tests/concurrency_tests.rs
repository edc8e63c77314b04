//! Concurrency property tests
//!
//! These tests drive shared accounts from many threads at once and check the
//! locking guarantees: no lost updates, no negative balances, atomic
//! transfers, termination of opposing transfers, and well-defined
//! self-transfers.

use concurrent_ledger::core::read_pair;
use concurrent_ledger::{
    Account, LedgerError, OperationReport, Receipt, Script, DEFAULT_LOCK_TIMEOUT,
};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

const THREAD_COUNT: usize = 16;
const ITERATIONS_PER_THREAD: usize = 50;

fn dec(value: i64) -> Decimal {
    Decimal::from(value)
}

fn successful_delta(reports: &[OperationReport], account: u32) -> Decimal {
    reports
        .iter()
        .filter_map(OperationReport::receipt)
        .map(|receipt| receipt.delta(account))
        .sum()
}

/// Mixed deposits, withdrawals and transfers across three accounts.
/// Every final balance must equal its initial balance plus the deltas of the
/// operations that reported success.
#[test]
fn test_mixed_operations_lose_no_updates() {
    let accounts: Vec<Arc<Account>> = (1..=3)
        .map(|id| Arc::new(Account::new(id, dec(500))))
        .collect();
    let barrier = Arc::new(Barrier::new(THREAD_COUNT));

    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|thread_id| {
            let accounts = accounts.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let mut reports = Vec::with_capacity(ITERATIONS_PER_THREAD);
                for i in 0..ITERATIONS_PER_THREAD {
                    let source = &accounts[(thread_id + i) % 3];
                    let target = &accounts[(thread_id + i + 1) % 3];
                    let amount = dec(((thread_id * 7 + i * 3) % 40 + 1) as i64);
                    let report = match (thread_id + i) % 3 {
                        0 => source.deposit(amount),
                        1 => source.withdraw(amount),
                        _ => source.transfer(target, amount),
                    };
                    reports.push(report);
                }
                reports
            })
        })
        .collect();

    let reports: Vec<OperationReport> = handles
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .collect();

    assert_eq!(reports.len(), THREAD_COUNT * ITERATIONS_PER_THREAD);
    for account in &accounts {
        assert_eq!(
            account.balance(),
            dec(500) + successful_delta(&reports, account.id()),
            "account {} lost an update",
            account.id()
        );
        assert!(account.balance() >= Decimal::ZERO);
    }
}

/// Fifty concurrent withdrawals of 7 from a balance of 100: exactly fourteen
/// succeed and the balance ends at 2.
#[test]
fn test_concurrent_withdrawals_never_overdraw() {
    let account = Arc::new(Account::new(1, dec(100)));
    let barrier = Arc::new(Barrier::new(50));

    let handles: Vec<_> = (0..50)
        .map(|_| {
            let account = Arc::clone(&account);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                account.withdraw(dec(7))
            })
        })
        .collect();

    let reports: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let succeeded = reports.iter().filter(|r| r.is_success()).count();
    let insufficient = reports
        .iter()
        .filter(|r| matches!(r.error(), Some(LedgerError::InsufficientFunds { .. })))
        .count();

    assert_eq!(succeeded, 14);
    assert_eq!(insufficient, 36);
    assert_eq!(account.balance(), dec(2));
}

/// A reader samples both balances under the dual-lock protocol while
/// transfers run in both directions. Every sample must show the same total.
#[test]
fn test_transfers_are_atomic_to_a_pair_reader() {
    let a = Arc::new(Account::new(1, dec(1000)));
    let b = Arc::new(Account::new(2, dec(1000)));
    let done = Arc::new(AtomicBool::new(false));

    let reader = {
        let (a, b, done) = (Arc::clone(&a), Arc::clone(&b), Arc::clone(&done));
        thread::spawn(move || {
            let mut samples = 0usize;
            while !done.load(Ordering::Acquire) {
                if let Ok((balance_a, balance_b)) = read_pair(&a, &b, DEFAULT_LOCK_TIMEOUT) {
                    assert_eq!(balance_a + balance_b, dec(2000));
                    samples += 1;
                }
            }
            samples
        })
    };

    thread::scope(|scope| {
        for thread_id in 0..8 {
            let (a, b) = (&a, &b);
            scope.spawn(move || {
                for i in 0..ITERATIONS_PER_THREAD {
                    let amount = dec((i % 25 + 1) as i64);
                    let report = if (thread_id + i) % 2 == 0 {
                        a.transfer(b, amount)
                    } else {
                        b.transfer(a, amount)
                    };
                    if let Some(Receipt::Transferred {
                        from_balance,
                        to_balance,
                        ..
                    }) = report.receipt()
                    {
                        assert_eq!(*from_balance + *to_balance, dec(2000));
                    }
                }
            });
        }
    });

    done.store(true, Ordering::Release);
    let samples = reader.join().unwrap();

    assert!(samples > 0);
    assert_eq!(a.balance() + b.balance(), dec(2000));
}

/// Opposing transfers between the same pair always terminate, well inside the
/// worst case of two bounded waits per call.
#[test]
fn test_opposing_transfers_terminate() {
    const UNITS: usize = 40;

    let a = Arc::new(Account::new(1, dec(100)));
    let b = Arc::new(Account::new(2, dec(100)));
    let barrier = Arc::new(Barrier::new(UNITS));
    let completed = Arc::new(AtomicUsize::new(0));

    let started = Instant::now();
    let handles: Vec<_> = (0..UNITS)
        .map(|unit| {
            let (a, b) = (Arc::clone(&a), Arc::clone(&b));
            let barrier = Arc::clone(&barrier);
            let completed = Arc::clone(&completed);
            thread::spawn(move || {
                barrier.wait();
                let report = if unit % 2 == 0 {
                    a.transfer(&b, dec(30))
                } else {
                    b.transfer(&a, dec(30))
                };
                completed.fetch_add(1, Ordering::SeqCst);
                report
            })
        })
        .collect();

    let reports: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let elapsed = started.elapsed();

    assert_eq!(completed.load(Ordering::SeqCst), UNITS);
    assert!(
        elapsed < Duration::from_millis(200) * UNITS as u32,
        "opposing transfers took {:?}",
        elapsed
    );
    for report in &reports {
        assert!(
            report.elapsed < DEFAULT_LOCK_TIMEOUT * 2 + Duration::from_millis(500)
        );
        if let Err(e) = &report.outcome {
            assert!(matches!(
                e,
                LedgerError::InsufficientFunds { .. } | LedgerError::LockTimeout { .. }
            ));
        }
    }
    assert_eq!(a.balance() - dec(100), successful_delta(&reports, 1));
    assert_eq!(a.balance() + b.balance(), dec(200));
}

/// Self-transfers are rejected immediately, even while other workers hold
/// the account's lock, and never move money.
#[test]
fn test_self_transfer_never_hangs_or_double_debits() {
    let account = Arc::new(Account::new(1, dec(100)));
    let other = Arc::new(Account::new(2, dec(0)));

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..20 {
                    account.deposit(dec(1));
                    account.transfer(&other, dec(1));
                }
            });
        }
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..20 {
                    let report = account.transfer(&account, dec(50));
                    assert_eq!(
                        report.error(),
                        Some(&LedgerError::SelfTransfer { account: 1 })
                    );
                    assert!(report.elapsed < DEFAULT_LOCK_TIMEOUT);
                }
            });
        }
    });

    assert_eq!(account.balance() + other.balance(), dec(180));
}

/// The reference scenario with one thread per operation, as the CLI's
/// concurrent mode runs it. Which debits fail depends on scheduling; the
/// books must balance either way.
#[test]
fn test_reference_scenario_one_thread_per_operation() {
    use concurrent_ledger::Ledger;

    for _ in 0..10 {
        let script = Script::reference();
        let ledger = Arc::new(Ledger::from_script(&script, DEFAULT_LOCK_TIMEOUT).unwrap());

        let handles: Vec<_> = script
            .operations
            .iter()
            .copied()
            .map(|operation| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || ledger.execute(&operation).unwrap())
            })
            .collect();
        let reports: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let balance_1 = ledger.get(1).unwrap().balance();
        let balance_2 = ledger.get(2).unwrap().balance();

        assert_eq!(balance_1, dec(1000) + successful_delta(&reports, 1));
        assert_eq!(balance_2, dec(1000) + successful_delta(&reports, 2));
        assert!(balance_1 >= Decimal::ZERO && balance_2 >= Decimal::ZERO);
        if reports.iter().all(OperationReport::is_success) {
            assert_eq!((balance_1, balance_2), (dec(750), dec(850)));
        }
    }
}
