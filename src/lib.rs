//! siteledger keeps a construction expense ledger in a Google Sheet. Expenses are
//! recorded with a date, description, vendor, bill number, and amount; the sheet is
//! kept sorted by date with serial numbers rewritten on every change.

mod api;
pub mod args;
pub mod commands;
mod config;
mod error;
mod login;
pub mod model;
#[cfg(test)]
mod test;
mod utils;

pub use api::Mode;
pub use config::Config;
pub use error::{error_kind, Error, ErrorKind, Result};
pub use login::require_login;
