//! Operation-related types for the concurrent ledger
//!
//! This module defines the requests a caller can issue against accounts, the
//! receipts returned on success, and the per-call report that pairs an outcome
//! with the wall-clock duration of the call.

use super::account::AccountId;
use super::error::LedgerError;
use rust_decimal::Decimal;
use std::fmt;
use std::time::Duration;

/// The three operations supported by the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Deposit,
    Withdraw,
    Transfer,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Deposit => "deposit",
            OperationKind::Withdraw => "withdraw",
            OperationKind::Transfer => "transfer",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single operation request
///
/// Requests name accounts by identity; a `core::Ledger` resolves them to
/// shared `Account` instances before execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Credit `amount` to `account`
    Deposit { account: AccountId, amount: Decimal },

    /// Debit `amount` from `account` if the balance covers it
    Withdraw { account: AccountId, amount: Decimal },

    /// Move `amount` from `from` to `to` under the dual-lock protocol
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    },
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Deposit { .. } => OperationKind::Deposit,
            Operation::Withdraw { .. } => OperationKind::Withdraw,
            Operation::Transfer { .. } => OperationKind::Transfer,
        }
    }

    /// Every account identity this request touches
    pub fn accounts(&self) -> Vec<AccountId> {
        match *self {
            Operation::Deposit { account, .. } | Operation::Withdraw { account, .. } => {
                vec![account]
            }
            Operation::Transfer { from, to, .. } => vec![from, to],
        }
    }
}

/// Successful outcome of an operation, carrying the resulting balance(s)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receipt {
    Deposited {
        account: AccountId,
        amount: Decimal,
        balance: Decimal,
    },
    Withdrew {
        account: AccountId,
        amount: Decimal,
        balance: Decimal,
    },
    Transferred {
        from: AccountId,
        to: AccountId,
        amount: Decimal,
        from_balance: Decimal,
        to_balance: Decimal,
    },
}

impl Receipt {
    /// Net change this receipt applied to `account`
    ///
    /// Zero for accounts the operation did not touch.
    pub fn delta(&self, account: AccountId) -> Decimal {
        match *self {
            Receipt::Deposited {
                account: id,
                amount,
                ..
            } if id == account => amount,
            Receipt::Withdrew {
                account: id,
                amount,
                ..
            } if id == account => -amount,
            Receipt::Transferred { from, amount, .. } if from == account => -amount,
            Receipt::Transferred { to, amount, .. } if to == account => amount,
            _ => Decimal::ZERO,
        }
    }
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Receipt::Deposited {
                account,
                amount,
                balance,
            } => write!(
                f,
                "Deposited {} into account {}. New balance: {}",
                amount, account, balance
            ),
            Receipt::Withdrew {
                account,
                amount,
                balance,
            } => write!(
                f,
                "Withdrew {} from account {}. New balance: {}",
                amount, account, balance
            ),
            Receipt::Transferred {
                from,
                to,
                amount,
                from_balance,
                to_balance,
            } => write!(
                f,
                "Transferred {} from account {} to account {}. New balances: {} / {}",
                amount, from, to, from_balance, to_balance
            ),
        }
    }
}

/// Report produced by every operation call
///
/// The outcome is either a receipt or the domain error that stopped the
/// operation; `elapsed` covers lock waits and the critical section.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationReport {
    pub kind: OperationKind,
    pub outcome: Result<Receipt, LedgerError>,
    pub elapsed: Duration,
}

impl OperationReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn receipt(&self) -> Option<&Receipt> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&LedgerError> {
        self.outcome.as_ref().err()
    }

    pub fn into_result(self) -> Result<Receipt, LedgerError> {
        self.outcome
    }
}
