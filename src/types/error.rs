//! Error types for the concurrent ledger
//!
//! This module defines all error types that can occur while executing
//! operations against shared accounts or while loading a script.
//!
//! # Error Categories
//!
//! - **Domain Outcomes**: Insufficient funds, lock timeout, invalid amount,
//!   self-transfer, arithmetic overflow. These are reported per call and never
//!   abort a run; balances are left unchanged.
//! - **Registry Errors**: Duplicate or unknown account identities
//! - **Script Errors**: File not found, I/O errors, malformed CSV rows

use super::account::AccountId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the ledger
///
/// Each variant includes the context needed to explain the outcome in a log
/// line without consulting the account again.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// The debited account holds less than the requested amount
    ///
    /// Raised by withdraw and transfer. The balance is unchanged.
    #[error("Insufficient funds in account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Account that would have been debited
        account: AccountId,
        /// Balance observed under the lock
        balance: Decimal,
        /// Requested debit
        requested: Decimal,
    },

    /// A transfer could not acquire both account locks within the bound
    ///
    /// This is the deadlock-avoidance abort. Neither balance was touched.
    #[error("Lock timeout on transfer from account {from} to account {to} (first acquired: {first_acquired}, second acquired: {second_acquired})")]
    LockTimeout {
        /// Source account
        from: AccountId,
        /// Target account
        to: AccountId,
        /// Whether the lower-id account's lock was granted
        first_acquired: bool,
        /// Whether the higher-id account's lock was granted
        second_acquired: bool,
    },

    /// Amount is zero or negative
    #[error("Invalid amount {amount}: amounts must be positive")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Transfer source and target are the same account
    #[error("Transfer from account {account} to itself is not allowed")]
    SelfTransfer {
        /// The account named on both sides
        account: AccountId,
    },

    /// Arithmetic overflow would occur
    #[error("Arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account whose balance would overflow
        account: AccountId,
    },

    /// An account with this identity is already registered
    #[error("Account {account} already exists")]
    DuplicateAccount {
        /// The duplicated identity
        account: AccountId,
    },

    /// No account with this identity is registered
    #[error("Account {account} not found")]
    UnknownAccount {
        /// The missing identity
        account: AccountId,
    },

    /// A worker running an operation failed to complete
    ///
    /// Only raised by the concurrent strategy when a worker panics or the
    /// runtime cannot be built.
    #[error("Worker failed: {message}")]
    WorkerFailed {
        /// Description of the failure
        message: String,
    },

    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Unknown operation type in a script row
    #[error("Invalid operation type '{op_type}' at line {line}")]
    InvalidOperationType {
        /// The unrecognised type string
        op_type: String,
        /// Line number of the row
        line: u64,
    },

    /// A script row is missing a field its operation requires
    #[error("Missing {field} at line {line}")]
    MissingField {
        /// Name of the missing column
        field: String,
        /// Line number of the row
        line: u64,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account: AccountId, balance: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            account,
            balance,
            requested,
        }
    }

    /// Create a LockTimeout error
    pub fn lock_timeout(
        from: AccountId,
        to: AccountId,
        first_acquired: bool,
        second_acquired: bool,
    ) -> Self {
        LedgerError::LockTimeout {
            from,
            to,
            first_acquired,
            second_acquired,
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal) -> Self {
        LedgerError::InvalidAmount { amount }
    }

    /// Create a SelfTransfer error
    pub fn self_transfer(account: AccountId) -> Self {
        LedgerError::SelfTransfer { account }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account: AccountId) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            account,
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: &str, line: u64) -> Self {
        LedgerError::MissingField {
            field: field.to_string(),
            line,
        }
    }

    /// Whether this is a reported operation outcome rather than a harness failure
    pub fn is_domain_outcome(&self) -> bool {
        matches!(
            self,
            LedgerError::InsufficientFunds { .. }
                | LedgerError::LockTimeout { .. }
                | LedgerError::InvalidAmount { .. }
                | LedgerError::SelfTransfer { .. }
                | LedgerError::ArithmeticOverflow { .. }
        )
    }
}
