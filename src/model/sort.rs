//! The sort/renumber routine applied to the ledger on every retrieval and mutation.
//!
//! Rows are ordered by their parsed date and the serial-number column is rewritten to
//! the new 1-based positions. The routine is pure: it builds a new `Table` and never
//! mutates the input.

use crate::model::{Table, DATE_COLUMN, SERIAL_COLUMN};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The fixed date format used everywhere in the sheet.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Sort direction for the date column.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Descending by date, the default presentation order.
    #[default]
    NewestFirst,
    /// Ascending by date.
    OldestFirst,
}

serde_plain::derive_display_from_serialize!(SortOrder);
serde_plain::derive_fromstr_from_deserialize!(SortOrder);

/// Sorts the data rows of `table` by date and renumbers the serial column 1..N.
///
/// A row whose date field is missing or does not parse as `DD/MM/YYYY` sorts with the
/// minimum representable date. Because the sentinel is the minimum in both directions,
/// such rows land last under newest-first and first under oldest-first. Downstream
/// behavior depends on this placement, so it is kept as-is.
///
/// The sort is stable: rows with equal dates keep their relative input order. An empty
/// or header-only table is returned unchanged.
pub fn sort_by_date(table: &Table, order: SortOrder) -> Table {
    if table.is_empty() {
        return table.clone();
    }

    // Precompute keys so each row's date is parsed once.
    let mut keyed: Vec<(NaiveDate, Vec<String>)> = table
        .rows()
        .iter()
        .map(|row| (sort_key(row), row.clone()))
        .collect();

    match order {
        SortOrder::NewestFirst => keyed.sort_by(|a, b| b.0.cmp(&a.0)),
        SortOrder::OldestFirst => keyed.sort_by(|a, b| a.0.cmp(&b.0)),
    }

    let rows = keyed
        .into_iter()
        .enumerate()
        .map(|(ix, (_, mut row))| {
            if !row.is_empty() {
                row[SERIAL_COLUMN] = (ix + 1).to_string();
            }
            row
        })
        .collect();
    Table::from_parts(table.header().to_vec(), rows)
}

/// The sort key for a raw row: the parsed date, or the minimum date when the field is
/// missing or unparsable.
fn sort_key(row: &[String]) -> NaiveDate {
    row.get(DATE_COLUMN)
        .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
        .unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HEADER;

    fn row(serial: &str, date: &str, desc: &str, amount: &str) -> Vec<String> {
        vec![
            serial.to_string(),
            date.to_string(),
            desc.to_string(),
            "Some Vendor".to_string(),
            "N/A".to_string(),
            amount.to_string(),
        ]
    }

    fn table(rows: Vec<Vec<String>>) -> Table {
        let mut values = vec![HEADER.iter().map(|s| s.to_string()).collect::<Vec<_>>()];
        values.extend(rows);
        Table::new(values).unwrap()
    }

    fn dates(t: &Table) -> Vec<&str> {
        t.rows().iter().map(|r| r[DATE_COLUMN].as_str()).collect()
    }

    fn serials(t: &Table) -> Vec<&str> {
        t.rows().iter().map(|r| r[SERIAL_COLUMN].as_str()).collect()
    }

    #[test]
    fn test_newest_first_scenario() {
        let t = table(vec![
            row("1", "01/01/2024", "Cement", "100.00"),
            row("2", "15/01/2024", "Sand", "50.00"),
        ]);
        let sorted = sort_by_date(&t, SortOrder::NewestFirst);
        assert_eq!(dates(&sorted), vec!["15/01/2024", "01/01/2024"]);
        assert_eq!(serials(&sorted), vec!["1", "2"]);
        assert_eq!(sorted.rows()[0][2], "Sand");
        assert_eq!(sorted.rows()[1][2], "Cement");
    }

    #[test]
    fn test_serials_are_contiguous() {
        let t = table(vec![
            row("9", "03/03/2024", "a", "1.00"),
            row("9", "01/01/2024", "b", "1.00"),
            row("9", "02/02/2024", "c", "1.00"),
        ]);
        let sorted = sort_by_date(&t, SortOrder::OldestFirst);
        assert_eq!(serials(&sorted), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_idempotent() {
        let t = table(vec![
            row("1", "03/03/2024", "a", "1.00"),
            row("2", "01/01/2024", "b", "1.00"),
            row("3", "bad-date", "c", "1.00"),
        ]);
        let once = sort_by_date(&t, SortOrder::NewestFirst);
        let twice = sort_by_date(&once, SortOrder::NewestFirst);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_opposite_directions_round_trip() {
        // Distinct valid dates: newest, then oldest, then newest again reproduces the
        // first ordering.
        let t = table(vec![
            row("1", "05/02/2024", "a", "1.00"),
            row("2", "01/01/2024", "b", "1.00"),
            row("3", "20/03/2024", "c", "1.00"),
        ]);
        let down = sort_by_date(&t, SortOrder::NewestFirst);
        let up = sort_by_date(&down, SortOrder::OldestFirst);
        let down_again = sort_by_date(&up, SortOrder::NewestFirst);
        assert_eq!(down, down_again);
    }

    #[test]
    fn test_unparsable_dates_last_when_newest_first() {
        let t = table(vec![
            row("1", "bad-date", "a", "1.00"),
            row("2", "01/01/2024", "b", "1.00"),
        ]);
        let sorted = sort_by_date(&t, SortOrder::NewestFirst);
        assert_eq!(dates(&sorted), vec!["01/01/2024", "bad-date"]);
    }

    #[test]
    fn test_unparsable_dates_first_when_oldest_first() {
        let t = table(vec![
            row("1", "01/01/2024", "a", "1.00"),
            row("2", "bad-date", "b", "1.00"),
        ]);
        let sorted = sort_by_date(&t, SortOrder::OldestFirst);
        assert_eq!(dates(&sorted), vec!["bad-date", "01/01/2024"]);
    }

    #[test]
    fn test_short_row_sorts_as_unparsable() {
        let mut t = table(vec![row("1", "01/01/2024", "a", "1.00")]);
        t.push_row(vec!["2".to_string()]);
        let sorted = sort_by_date(&t, SortOrder::NewestFirst);
        assert_eq!(sorted.rows()[1], vec!["2".to_string()]);
        let sorted = sort_by_date(&t, SortOrder::OldestFirst);
        assert_eq!(sorted.rows()[0], vec!["1".to_string()]);
    }

    #[test]
    fn test_stability_on_equal_dates() {
        let t = table(vec![
            row("1", "01/01/2024", "first", "1.00"),
            row("2", "01/01/2024", "second", "1.00"),
            row("3", "01/01/2024", "third", "1.00"),
        ]);
        for order in [SortOrder::NewestFirst, SortOrder::OldestFirst] {
            let sorted = sort_by_date(&t, order);
            let descriptions: Vec<&str> =
                sorted.rows().iter().map(|r| r[2].as_str()).collect();
            assert_eq!(descriptions, vec!["first", "second", "third"]);
        }
    }

    #[test]
    fn test_header_only_table_unchanged() {
        let t = table(vec![]);
        let sorted = sort_by_date(&t, SortOrder::NewestFirst);
        assert_eq!(t, sorted);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let t = table(vec![
            row("1", "01/01/2024", "a", "1.00"),
            row("2", "15/01/2024", "b", "1.00"),
        ]);
        let before = t.clone();
        let _ = sort_by_date(&t, SortOrder::NewestFirst);
        assert_eq!(t, before);
    }

    #[test]
    fn test_sort_order_display() {
        assert_eq!(SortOrder::NewestFirst.to_string(), "newest-first");
        assert_eq!(
            "oldest-first".parse::<SortOrder>().unwrap(),
            SortOrder::OldestFirst
        );
    }
}
