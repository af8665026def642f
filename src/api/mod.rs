//! The row-store boundary: a small trait over the remote sheet plus its Google and
//! in-memory implementations.

mod files;
mod google;
mod oauth;
mod test_sheet;

use crate::error::{ErrorKind, IntoResult};
use crate::{Config, Result};

pub(crate) use oauth::{authorization_url, exchange_code, parse_authorization_code, TokenProvider};
pub(crate) use test_sheet::TestSheet;

/// OAuth scope required for Sheets API access.
pub(crate) const OAUTH_SCOPES: &[&str] = &["https://www.googleapis.com/auth/spreadsheets"];

/// Selects the sheet implementation. This allows running the whole app, top-to-bottom,
/// without touching the Google APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Google,
    Test,
}

impl Mode {
    /// When `SITELEDGER_IN_TEST_MODE` is set and non-zero in length, the mode is
    /// `Mode::Test`, otherwise it is `Mode::Google`.
    pub fn from_env() -> Self {
        match std::env::var("SITELEDGER_IN_TEST_MODE") {
            Ok(s) if !s.is_empty() => Mode::Test,
            _ => Mode::Google,
        }
    }
}

/// The operations the ledger needs from the remote sheet. Rows are ordered string
/// tuples; the header, when present, is the first row. Failures mean the operation did
/// not commit; callers surface them and never retry internally.
#[async_trait::async_trait]
pub(crate) trait Sheet {
    /// Returns the header plus all persisted data rows, or an empty grid when nothing
    /// has been persisted yet.
    async fn fetch_all(&mut self) -> Result<Vec<Vec<String>>>;

    /// Overwrites all persisted rows with exactly `values`.
    async fn replace_all(&mut self, values: &[Vec<String>]) -> Result<()>;

    /// Appends a single row after the last persisted row. Used only to bootstrap the
    /// header on an empty sheet.
    async fn append_row(&mut self, row: &[String]) -> Result<()>;
}

/// Creates the `Sheet` implementation for `mode`.
pub(crate) async fn sheet(config: &Config, mode: Mode) -> Result<Box<dyn Sheet + Send>> {
    match mode {
        Mode::Google => {
            let token_provider =
                TokenProvider::load(&config.client_secret_path(), &config.token_path())
                    .await
                    .kind(ErrorKind::Connection)?;
            let google = google::GoogleSheet::new(config.clone(), token_provider).await?;
            Ok(Box::new(google))
        }
        Mode::Test => Ok(Box::new(TestSheet::new(config.spreadsheet_id()))),
    }
}
