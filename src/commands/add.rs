//! Add command handler.

use crate::api::{self, Mode};
use crate::args::AddArgs;
use crate::commands::{fetch_table, Out};
use crate::error::{ErrorKind, IntoResult};
use crate::model::{sort_by_date, ExpenseRow, DATE_FORMAT};
use crate::{Config, Result};
use anyhow::anyhow;
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use tracing::debug;

/// Records a new expense: validates the inputs, appends the row, re-sorts the ledger
/// by date, renumbers the serials, and writes the whole table back.
pub async fn add(config: Config, mode: Mode, args: AddArgs) -> Result<Out<ExpenseRow>> {
    let date = match args.date() {
        Some(date) => date.to_string(),
        None => Local::now().format(DATE_FORMAT).to_string(),
    };
    validate(&date, args.description(), args.vendor(), args.amount().value())?;

    let mut sheet = api::sheet(&config, mode).await?;
    let mut table = fetch_table(sheet.as_mut()).await?;
    debug!("Fetched {} existing expense rows", table.len());

    let expense = ExpenseRow::new(
        date.as_str(),
        args.description(),
        args.vendor(),
        args.bill_number().map(String::from),
        args.amount(),
    );
    table.push_row(expense.to_row());
    let sorted = sort_by_date(&table, args.order());
    sheet.replace_all(&sorted.to_values()).await?;

    let message = format!(
        "Recorded {} expense of {} from {} on {}",
        args.description(),
        args.amount(),
        args.vendor(),
        date
    );
    Ok(Out::new(message, expense))
}

fn validate(date: &str, description: &str, vendor: &str, amount: Decimal) -> Result<()> {
    if description.trim().is_empty() {
        return Err(anyhow!("A description is required")).kind(ErrorKind::Validation);
    }
    if vendor.trim().is_empty() {
        return Err(anyhow!("A vendor is required")).kind(ErrorKind::Validation);
    }
    if amount <= Decimal::ZERO {
        return Err(anyhow!("The amount must be greater than zero, got {amount}"))
            .kind(ErrorKind::Validation);
    }
    if NaiveDate::parse_from_str(date, DATE_FORMAT).is_err() {
        return Err(anyhow!(
            "'{date}' is not a valid date; expected DD/MM/YYYY"
        ))
        .kind(ErrorKind::Validation);
    }
    Ok(())
}
