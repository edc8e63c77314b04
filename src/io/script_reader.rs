//! Streaming reader over script rows
//!
//! `ScriptReader` yields one `Result<ScriptEntry, LedgerError>` per CSV row,
//! delegating conversion to the `csv_format` module. `read_script` collects
//! the rows into a `Script`, skipping malformed rows with a warning.
//!
//! ```no_run
//! use concurrent_ledger::io::read_script;
//! use std::path::Path;
//!
//! let script = read_script(Path::new("script.csv")).unwrap();
//! println!("{} operations on {} accounts", script.operations.len(), script.accounts.len());
//! ```

use crate::io::csv_format::{convert_script_record, ScriptEntry, ScriptRecord};
use crate::types::{LedgerError, Script};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use tracing::warn;

/// Synchronous CSV reader over script rows
#[derive(Debug)]
pub struct ScriptReader {
    reader: csv::Reader<File>,
    headers: StringRecord,
}

impl ScriptReader {
    /// Open a script file
    ///
    /// Fields are trimmed and rows may omit trailing empty columns.
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` if the path does not exist, `IoError` for other
    /// open failures, and `ParseError` if the header row cannot be read.
    pub fn new(path: &Path) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LedgerError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => LedgerError::from(e),
        })?;

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);
        let headers = reader.headers()?.clone();

        Ok(Self { reader, headers })
    }
}

impl Iterator for ScriptReader {
    type Item = Result<ScriptEntry, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut row = StringRecord::new();

        match self.reader.read_record(&mut row) {
            Ok(false) => None,
            Ok(true) => {
                let line = row.position().map(|pos| pos.line()).unwrap_or_default();
                Some(
                    row.deserialize::<ScriptRecord>(Some(&self.headers))
                        .map_err(LedgerError::from)
                        .and_then(|record| convert_script_record(record, line)),
                )
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}

/// Read a whole script
///
/// Malformed rows are logged and skipped; the remaining rows keep their
/// relative order.
///
/// # Errors
///
/// Only failures to open the file or read its header are returned.
pub fn read_script(path: &Path) -> Result<Script, LedgerError> {
    let mut script = Script::default();

    for entry in ScriptReader::new(path)? {
        match entry {
            Ok(ScriptEntry::Open {
                account,
                initial_balance,
            }) => script.accounts.push((account, initial_balance)),
            Ok(ScriptEntry::Operation(operation)) => script.operations.push(operation),
            Err(e) => warn!("Skipping script row: {}", e),
        }
    }

    Ok(script)
}
