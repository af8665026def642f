//! The raw tabular representation of the sheet: one header row plus ordered data rows.
//!
//! Rows are kept as the string tuples the sheet returns. Real sheets contain ragged
//! rows (manual edits leave trailing cells missing), so nothing here assumes six
//! fields; the typed [`ExpenseRow`] view is built on demand.

use crate::model::{Amount, ExpenseRow, AMOUNT_COLUMN, HEADER};
use crate::Result;
use anyhow::bail;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Header row plus ordered data rows; the full in-memory representation of the
/// persisted record set. A `Table` always has a header: constructing one from a value
/// grid with no rows at all is a precondition violation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Builds a `Table` from the raw value grid returned by the sheet. The first row
    /// is taken as the header.
    pub fn new<S, R>(values: impl IntoIterator<Item = R>) -> Result<Self>
    where
        S: Into<String>,
        R: IntoIterator<Item = S>,
    {
        let mut rows = values.into_iter();
        let header: Vec<String> = match rows.next() {
            Some(header_row) => header_row.into_iter().map(|s| s.into()).collect(),
            None => bail!("An empty value grid cannot be parsed into a Table"),
        };
        let rows = rows
            .map(|row| row.into_iter().map(|s| s.into()).collect())
            .collect();
        Ok(Self { header, rows })
    }

    /// A table with the canonical six-column header and no data rows. Used to
    /// bootstrap an empty sheet.
    pub fn with_canonical_header() -> Self {
        Self {
            header: HEADER.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub(crate) fn from_parts(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { header, rows }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// The number of data rows (the header does not count).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a raw data row.
    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// The full value grid, header first, as written back to the sheet.
    pub fn to_values(&self) -> Vec<Vec<String>> {
        let mut values = Vec::with_capacity(self.rows.len() + 1);
        values.push(self.header.clone());
        values.extend(self.rows.iter().cloned());
        values
    }

    /// Typed views of the data rows, for rendering.
    pub fn expenses(&self) -> Vec<ExpenseRow> {
        self.rows.iter().map(|r| ExpenseRow::from_row(r)).collect()
    }

    /// Sum of the amount column. Unparsable amounts count as zero.
    pub fn total(&self) -> Amount {
        let sum: Decimal = self
            .rows
            .iter()
            .map(|row| {
                row.get(AMOUNT_COLUMN)
                    .and_then(|s| Amount::from_str(s).ok())
                    .map(|a| a.value())
                    .unwrap_or_default()
            })
            .sum();
        Amount::new(sum)
    }
}
