//! List command handler.

use crate::api::{self, Mode};
use crate::commands::{fetch_table, Out};
use crate::model::{sort_by_date, Amount, ExpenseRow, SortOrder};
use crate::{Config, Result};
use serde::Serialize;
use std::fmt::Write;

/// The structured output of the list command: the sorted entries plus the count and
/// total summary.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    entries: usize,
    total: Amount,
    expenses: Vec<ExpenseRow>,
}

impl Report {
    pub fn entries(&self) -> usize {
        self.entries
    }

    pub fn total(&self) -> Amount {
        self.total
    }

    pub fn expenses(&self) -> &[ExpenseRow] {
        &self.expenses
    }
}

/// Shows the ledger sorted newest-first with the entry count and total amount. The
/// sorted order is written back so the sheet matches what was displayed.
pub async fn list(config: Config, mode: Mode) -> Result<Out<Report>> {
    let mut sheet = api::sheet(&config, mode).await?;
    let table = fetch_table(sheet.as_mut()).await?;
    if table.is_empty() {
        return Ok("No expenses recorded yet. Record your first expense with 'siteledger add'."
            .into());
    }

    let sorted = sort_by_date(&table, SortOrder::NewestFirst);
    sheet.replace_all(&sorted.to_values()).await?;

    let report = Report {
        entries: sorted.len(),
        total: sorted.total(),
        expenses: sorted.expenses(),
    };
    Ok(Out::new(render_report(&report), report))
}

/// Renders the report as an aligned text table followed by the summary lines.
fn render_report(report: &Report) -> String {
    let mut rows: Vec<[String; 6]> = vec![[
        "Sl No".to_string(),
        "Date".to_string(),
        "Item Description".to_string(),
        "Vendor".to_string(),
        "Bill Number".to_string(),
        "Amount".to_string(),
    ]];
    for e in report.expenses() {
        rows.push([
            e.serial.to_string(),
            e.date.clone(),
            e.description.clone(),
            e.vendor.clone(),
            e.bill_number.clone(),
            Amount::new(e.amount.value()).to_string(),
        ]);
    }

    let mut widths = [0usize; 6];
    for row in &rows {
        for (ix, cell) in row.iter().enumerate() {
            widths[ix] = widths[ix].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in &rows {
        let line = row
            .iter()
            .enumerate()
            .map(|(ix, cell)| format!("{cell:<width$}", width = widths[ix]))
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(out, "{}", line.trim_end());
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Entries: {}", report.entries());
    let _ = write!(out, "Total: {}", report.total());
    out
}
