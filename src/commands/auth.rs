//! Auth command handlers.

use crate::api::{self, Mode};
use crate::commands::{fetch_table, Out};
use crate::error::{ErrorKind, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Runs the interactive OAuth consent flow: prints the authorization URL, reads the
/// pasted redirect URL (or bare code) from stdin, and exchanges it for tokens.
pub async fn auth(config: &Config) -> Result<Out<String>> {
    let url = api::authorization_url(&config.client_secret_path())
        .await
        .kind(ErrorKind::Connection)?;

    println!("Open this URL in your browser and authorize access:\n\n{url}\n");
    println!("Then paste the full redirect URL (or just the code) here and press enter:");

    let mut line = String::new();
    let mut reader = BufReader::new(tokio::io::stdin());
    reader
        .read_line(&mut line)
        .await
        .context("Failed to read the authorization code from stdin")?;
    let code = api::parse_authorization_code(&line).kind(ErrorKind::Validation)?;

    api::exchange_code(&config.client_secret_path(), &config.token_path(), code)
        .await
        .kind(ErrorKind::Connection)?;

    let token_path = config.token_path().display().to_string();
    Ok(Out::new(
        format!("Authorization succeeded; token saved to {token_path}"),
        token_path,
    ))
}

/// Verifies access by fetching the ledger and reporting the number of data rows.
pub async fn auth_verify(config: &Config, mode: Mode) -> Result<Out<usize>> {
    let mut sheet = api::sheet(config, mode).await?;
    let table = fetch_table(sheet.as_mut()).await?;
    let rows = table.len();
    Ok(Out::new(
        format!("Access verified; the ledger currently has {rows} data rows"),
        rows,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_auth_verify_counts_rows() {
        let env = TestEnv::new().await;
        env.seed();
        let out = auth_verify(&env.config(), Mode::Test).await.unwrap();
        assert_eq!(out.structure(), Some(&5));
    }

    #[tokio::test]
    async fn test_auth_verify_empty_sheet() {
        let env = TestEnv::new().await;
        let out = auth_verify(&env.config(), Mode::Test).await.unwrap();
        assert_eq!(out.structure(), Some(&0));
        assert!(out.message().contains("0 data rows"));
    }
}
