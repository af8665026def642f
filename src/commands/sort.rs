//! Sort command handler.

use crate::api::{self, Mode};
use crate::args::SortArgs;
use crate::commands::{fetch_table, Out};
use crate::model::sort_by_date;
use crate::{Config, Result};

/// Re-sorts the ledger by date in the requested direction, renumbers the serials, and
/// writes the table back.
pub async fn sort(config: Config, mode: Mode, args: SortArgs) -> Result<Out<String>> {
    let mut sheet = api::sheet(&config, mode).await?;
    let table = fetch_table(sheet.as_mut()).await?;
    if table.is_empty() {
        return Ok("The ledger has no data rows to sort.".into());
    }

    let sorted = sort_by_date(&table, args.order());
    sheet.replace_all(&sorted.to_values()).await?;

    let order = args.order().to_string();
    Ok(Out::new(
        format!("Sorted {} expenses {}", sorted.len(), order),
        order,
    ))
}
