//! Data model for the expense ledger: the money type, the typed expense row, the raw
//! table representation, and the sort/renumber routine.

mod amount;
mod expense;
mod sort;
mod table;

pub use amount::Amount;
pub use expense::{ExpenseRow, AMOUNT_COLUMN, DATE_COLUMN, HEADER, NO_BILL_NUMBER, SERIAL_COLUMN};
pub use sort::{sort_by_date, SortOrder, DATE_FORMAT};
pub use table::Table;
