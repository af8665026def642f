//! Implements the `Sheet` trait using the `sheets::Client` to interact with a Google
//! sheet. It takes a `TokenProvider`, on which it calls refresh to keep the token
//! up-to-date.

use crate::api::{Sheet, TokenProvider};
use crate::error::{ErrorKind, IntoResult};
use crate::model::HEADER;
use crate::{Config, Result};
use anyhow::Context;
use sheets::types::{
    BatchUpdateValuesRequest, DateTimeRenderOption, Dimension, ValueInputOption, ValueRange,
    ValueRenderOption,
};
use sheets::ClientError;
use tracing::trace;

pub(super) struct GoogleSheet {
    config: Config,
    token_provider: TokenProvider,
    client: sheets::Client,
}

impl GoogleSheet {
    pub(super) async fn new(config: Config, mut token_provider: TokenProvider) -> Result<Self> {
        let client = create_sheets_client(&mut token_provider).await?;
        Ok(Self {
            config,
            token_provider,
            client,
        })
    }

    /// Refreshes the sheets client with a new access token if needed.
    async fn refresh_client(&mut self) -> Result<()> {
        self.client = create_sheets_client(&mut self.token_provider).await?;
        Ok(())
    }

    /// The six-column range holding the ledger, e.g. `Sheet1!A:F`.
    fn range(&self) -> String {
        format!("{}!A:F", self.config.sheet_name())
    }

    async fn write_range(&mut self, range: String, values: Vec<Vec<String>>) -> Result<()> {
        let request = BatchUpdateValuesRequest {
            data: vec![ValueRange {
                major_dimension: Some(Dimension::Rows),
                range,
                values,
            }],
            include_values_in_response: Some(false),
            response_date_time_render_option: None,
            response_value_render_option: None,
            value_input_option: Some(ValueInputOption::UserEntered),
        };
        self.client
            .spreadsheets()
            .values_batch_update(self.config.spreadsheet_id(), &request)
            .await
            .map_err(map_client_error)
            .context("Failed to write rows")?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Sheet for GoogleSheet {
    async fn fetch_all(&mut self) -> Result<Vec<Vec<String>>> {
        trace!("fetch_all from {}", self.config.sheet_name());
        self.refresh_client().await.kind(ErrorKind::Connection)?;
        let range = self.range();
        let response = self
            .client
            .spreadsheets()
            .values_get(
                self.config.spreadsheet_id(),
                &range,
                DateTimeRenderOption::FormattedString,
                Dimension::Rows,
                ValueRenderOption::FormattedValue,
            )
            .await
            .map_err(map_client_error)
            .with_context(|| format!("Failed to fetch data from {range}"))
            .kind(ErrorKind::Connection)?;
        Ok(response.body.values)
    }

    async fn replace_all(&mut self, values: &[Vec<String>]) -> Result<()> {
        trace!("replace_all with {} rows", values.len());

        // One write, padded with blank rows past the new length so a shrinking table
        // leaves no stale rows behind. Until that single call commits, the sheet keeps
        // its prior contents.
        let existing = self.fetch_all().await?;
        let grid = padded_grid(values, existing.len());

        let start = format!("{}!A1", self.config.sheet_name());
        self.write_range(start, grid).await.kind(ErrorKind::Persist)
    }

    async fn append_row(&mut self, row: &[String]) -> Result<()> {
        trace!("append_row to {}", self.config.sheet_name());
        let persisted = self.fetch_all().await?;
        let next = persisted.len() + 1;
        let start = format!("{}!A{next}", self.config.sheet_name());
        self.write_range(start, vec![row.to_vec()])
            .await
            .kind(ErrorKind::Persist)
    }
}

/// Creates a new sheets client with a refreshed access token.
async fn create_sheets_client(token_provider: &mut TokenProvider) -> Result<sheets::Client> {
    // Get the access token (will refresh if needed)
    let access_token = token_provider.token_with_refresh().await?;

    // Create sheets client
    // Note: The sheets crate requires client_id, client_secret, and redirect_uri,
    // but we don't need them for API calls, only the access token
    Ok(sheets::Client::new(
        String::new(), // client_id (not needed for API calls with access token)
        String::new(), // client_secret (not needed for API calls with access token)
        String::new(), // redirect_uri (not needed for API calls with access token)
        access_token.to_string(),
        String::new(), // refresh_token (not needed, we handle refresh ourselves)
    ))
}

/// The replacement grid extended with blank rows to cover `existing_rows`, so that a
/// single update both writes the new table and erases any rows beyond it.
fn padded_grid(values: &[Vec<String>], existing_rows: usize) -> Vec<Vec<String>> {
    let mut grid = values.to_vec();
    if existing_rows > grid.len() {
        let blank = vec![String::new(); HEADER.len()];
        grid.resize(existing_rows, blank);
    }
    grid
}

fn map_client_error(e: sheets::ClientError) -> anyhow::Error {
    let error_name = match &e {
        ClientError::EmptyRefreshToken => "EmptyRefreshToken".to_string(),
        ClientError::FromUtf8Error(inner) => format!("FromUtf8Error {inner}"),
        ClientError::UrlParserError(inner) => format!("UrlParserError {inner}"),
        ClientError::SerdeJsonError(inner) => format!("SerdeJsonError {inner}"),
        ClientError::ReqwestError(inner) => format!("ReqwestError {inner}"),
        ClientError::InvalidHeaderValue(inner) => format!("InvalidHeaderValue {inner}"),
        ClientError::ReqwestMiddleWareError(inner) => format!("ReqwestMiddleWareError {inner}"),
        ClientError::HttpError { .. } => "HttpError".to_string(),
        ClientError::Other(_) => "Other".to_string(),
    };
    Err::<(), ClientError>(e).context(error_name).err().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: usize) -> Vec<Vec<String>> {
        (0..rows)
            .map(|ix| vec![ix.to_string(), format!("01/0{}/2024", ix + 1)])
            .collect()
    }

    #[test]
    fn test_padded_grid_blanks_stale_rows() {
        let padded = padded_grid(&grid(2), 5);
        assert_eq!(padded.len(), 5);
        assert_eq!(padded[1][0], "1");
        for row in &padded[2..] {
            assert_eq!(row, &vec![String::new(); HEADER.len()]);
        }
    }

    #[test]
    fn test_padded_grid_no_padding_when_growing() {
        let values = grid(4);
        assert_eq!(padded_grid(&values, 3), values);
        assert_eq!(padded_grid(&values, 4), values);
    }

    #[test]
    fn test_padded_grid_empty_sheet() {
        let values = grid(2);
        assert_eq!(padded_grid(&values, 0), values);
    }
}
