//! CSV format handling for scripts and balance output
//!
//! This module centralizes all CSV format concerns, providing:
//! - ScriptRecord structure for deserialization
//! - Conversion from script rows to accounts and operations
//! - Balance output serialization
//!
//! All functions are pure (no file access) for easy testing.
//!
//! # Script format
//!
//! ```text
//! type,account,target,amount
//! open,1,,1000
//! open,2,,1000
//! transfer,1,2,300
//! withdraw,2,,500
//! deposit,2,,400
//! ```

use crate::types::{AccountId, LedgerError, Operation};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV row structure for deserialization
///
/// `target` is only used by transfers; `amount` is required by every row
/// type but kept optional here so a missing value gets a precise error.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScriptRecord {
    #[serde(rename = "type")]
    pub op_type: String,
    pub account: AccountId,
    pub target: Option<AccountId>,
    pub amount: Option<String>,
}

/// One converted script row
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptEntry {
    /// Declare an account with its initial balance
    Open {
        account: AccountId,
        initial_balance: Decimal,
    },

    /// Issue an operation
    Operation(Operation),
}

/// Convert a ScriptRecord to a ScriptEntry
///
/// Row types are case-insensitive; `withdrawal` is accepted as a synonym for
/// `withdraw`. Operation amounts are parsed but not range-checked: a
/// non-positive amount is rejected when the operation executes, so it shows
/// up in the run's reports. Initial balances must not be negative.
///
/// # Arguments
///
/// * `record` - The deserialized CSV row
/// * `line` - Line number of the row, for error context
pub fn convert_script_record(record: ScriptRecord, line: u64) -> Result<ScriptEntry, LedgerError> {
    let amount = match record.amount.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => {
            Decimal::from_str(raw).map_err(|_| LedgerError::ParseError {
                line: Some(line),
                message: format!("Invalid amount '{}'", raw),
            })?
        }
        _ => return Err(LedgerError::missing_field("amount", line)),
    };

    let entry = match record.op_type.trim().to_lowercase().as_str() {
        "open" => {
            if amount < Decimal::ZERO {
                return Err(LedgerError::invalid_amount(amount));
            }
            ScriptEntry::Open {
                account: record.account,
                initial_balance: amount,
            }
        }
        "deposit" => ScriptEntry::Operation(Operation::Deposit {
            account: record.account,
            amount,
        }),
        "withdraw" | "withdrawal" => ScriptEntry::Operation(Operation::Withdraw {
            account: record.account,
            amount,
        }),
        "transfer" => {
            let to = record
                .target
                .ok_or_else(|| LedgerError::missing_field("target", line))?;
            ScriptEntry::Operation(Operation::Transfer {
                from: record.account,
                to,
                amount,
            })
        }
        _ => {
            return Err(LedgerError::InvalidOperationType {
                op_type: record.op_type,
                line,
            })
        }
    };

    Ok(entry)
}

/// Write balances to CSV format
///
/// Writes `account,balance` rows sorted by account identity, with balances
/// at four decimal places for deterministic output.
pub fn write_balances_csv(
    balances: &[(AccountId, Decimal)],
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["account", "balance"])?;

    let mut sorted = balances.to_vec();
    sorted.sort_by_key(|(id, _)| *id);

    for (id, balance) in sorted {
        writer.write_record(&[id.to_string(), format!("{:.4}", balance)])?;
    }

    writer.flush()?;

    Ok(())
}
