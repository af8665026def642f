//! Command handlers for the siteledger CLI.
//!
//! This module contains implementations for all CLI subcommands. Each data command is
//! one synchronous fetch-mutate-persist cycle; nothing is retried and nothing is
//! cached between invocations.

mod add;
mod auth;
mod init;
mod list;
mod save;
mod sort;

use crate::api::Sheet;
use crate::model::Table;
use crate::Result;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use add::add;
pub use auth::{auth, auth_verify};
pub use init::init;
pub use list::{list, Report};
pub use save::save;
pub use sort::sort;

/// The output type for a command. This allows the command to return a consistent
/// message and, optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command
    /// execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to
    /// `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Fetches the current table, bootstrapping the canonical header onto an empty sheet
/// the way the original app did on every page load.
pub(crate) async fn fetch_table(sheet: &mut (dyn Sheet + Send)) -> Result<Table> {
    let values = sheet.fetch_all().await?;
    if values.is_empty() {
        let table = Table::with_canonical_header();
        sheet.append_row(table.header()).await?;
        return Ok(table);
    }
    Table::new(values)
}
