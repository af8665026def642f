//! Init command handler.

use crate::args::InitArgs;
use crate::commands::Out;
use crate::error::{ErrorKind, IntoResult};
use crate::{login, Config, Result};
use anyhow::anyhow;
use std::path::Path;

/// Creates the siteledger home directory, moves the OAuth client secret into place,
/// and writes the initial configuration. When a username and password are given, the
/// login credentials file is written too.
pub async fn init(home: &Path, args: &InitArgs) -> Result<Out<String>> {
    let config = Config::create(home, args.client_secret(), args.sheet_url(), args.sheet_name())
        .await?;

    match (args.username(), args.password()) {
        (Some(username), Some(password)) => {
            login::save_credentials(&config, username, password).await?;
        }
        (None, None) => {}
        _ => {
            return Err(anyhow!(
                "--username and --password must be provided together"
            ))
            .kind(ErrorKind::Validation)
        }
    }

    let root = config.root().display().to_string();
    let message = format!(
        "Initialized siteledger home at {root}. Run 'siteledger auth' to authorize \
         access to the sheet."
    );
    Ok(Out::new(message, root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::InitArgs;
    use crate::error::error_kind;
    use tempfile::TempDir;

    fn write_secret(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("client_secret.json");
        std::fs::write(&path, "{}").unwrap();
        path
    }

    #[tokio::test]
    async fn test_init_creates_home() {
        let dir = TempDir::new().unwrap();
        let secret = write_secret(&dir);
        let home = dir.path().join("ledger_home");
        let args = InitArgs::new(
            "https://docs.google.com/spreadsheets/d/InitTestSheet/edit",
            &secret,
            None,
            None,
            None,
        );

        let out = init(&home, &args).await.unwrap();
        assert!(out.message().contains("Initialized siteledger home"));

        let config = Config::load(&home).await.unwrap();
        assert_eq!(config.spreadsheet_id(), "InitTestSheet");
        assert!(config.client_secret_path().is_file());
    }

    #[tokio::test]
    async fn test_init_writes_login_file() {
        let dir = TempDir::new().unwrap();
        let secret = write_secret(&dir);
        let home = dir.path().join("ledger_home");
        let args = InitArgs::new(
            "https://docs.google.com/spreadsheets/d/InitLoginSheet/edit",
            &secret,
            None,
            Some("site-admin".to_string()),
            Some("hunter2".to_string()),
        );

        init(&home, &args).await.unwrap();

        let config = Config::load(&home).await.unwrap();
        crate::login::require_login(&config, Some("site-admin"), Some("hunter2"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_init_rejects_username_without_password() {
        let dir = TempDir::new().unwrap();
        let secret = write_secret(&dir);
        let home = dir.path().join("ledger_home");
        let args = InitArgs::new(
            "https://docs.google.com/spreadsheets/d/InitBadSheet/edit",
            &secret,
            None,
            Some("site-admin".to_string()),
            None,
        );

        let err = init(&home, &args).await.unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::Validation));
    }
}
