//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: The shared account cell and its identity
//! - `operation`: Operation requests, receipts and per-call reports
//! - `script`: A batch of accounts and operations for a harness run
//! - `error`: Error types for the ledger

pub mod account;
pub mod error;
pub mod operation;
pub mod script;

pub use account::{Account, AccountId};
pub use error::LedgerError;
pub use operation::{Operation, OperationKind, OperationReport, Receipt};
pub use script::Script;
