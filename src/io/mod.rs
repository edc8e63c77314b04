//! I/O module
//!
//! Handles CSV script parsing and balance output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (row conversion, balance serialization)
//! - `script_reader` - Streaming reader over script rows

pub mod csv_format;
pub mod script_reader;

pub use csv_format::{convert_script_record, write_balances_csv, ScriptEntry, ScriptRecord};
pub use script_reader::{read_script, ScriptReader};
