//! The typed view of a single ledger row.

use crate::model::Amount;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The canonical column names, in sheet order. This is the header row that gets
/// synthesized when the sheet is empty.
pub const HEADER: [&str; 6] = [
    "Sl No",
    "Date",
    "Item Description",
    "Vendor",
    "Bill Number",
    "Amount",
];

/// Column index of the serial number.
pub const SERIAL_COLUMN: usize = 0;

/// Column index of the date, the sort key.
pub const DATE_COLUMN: usize = 1;

/// Column index of the amount.
pub const AMOUNT_COLUMN: usize = 5;

/// Sentinel stored when the user supplies no bill number.
pub const NO_BILL_NUMBER: &str = "N/A";

/// A single expense entry. The serial number is positional bookkeeping: it is rewritten
/// on every sort and carries no identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExpenseRow {
    pub serial: u32,
    pub date: String,
    pub description: String,
    pub vendor: String,
    pub bill_number: String,
    pub amount: Amount,
}

impl ExpenseRow {
    /// Creates a row from user input. The serial number is a placeholder; sorting
    /// assigns the real one. A missing bill number becomes the `N/A` sentinel.
    pub fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        vendor: impl Into<String>,
        bill_number: Option<String>,
        amount: Amount,
    ) -> Self {
        let bill_number = match bill_number {
            Some(b) if !b.trim().is_empty() => b,
            _ => NO_BILL_NUMBER.to_string(),
        };
        Self {
            serial: 0,
            date: date.into(),
            description: description.into(),
            vendor: vendor.into(),
            bill_number,
            amount,
        }
    }

    /// Converts to the six-field string tuple the sheet stores. The amount is written
    /// as a plain decimal number so it round-trips numerically.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.serial.to_string(),
            self.date.clone(),
            self.description.clone(),
            self.vendor.clone(),
            self.bill_number.clone(),
            self.amount.sheet_value(),
        ]
    }

    /// Builds a typed view of a raw sheet row. Lenient: short rows produce empty
    /// fields and an unparsable amount reads as zero, matching how the original
    /// rendered malformed data rather than failing the whole report.
    pub fn from_row(row: &[String]) -> Self {
        let field = |ix: usize| row.get(ix).cloned().unwrap_or_default();
        Self {
            serial: field(SERIAL_COLUMN).trim().parse().unwrap_or_default(),
            date: field(DATE_COLUMN),
            description: field(2),
            vendor: field(3),
            bill_number: field(4),
            amount: Amount::from_str(&field(AMOUNT_COLUMN)).unwrap_or_default(),
        }
    }
}
