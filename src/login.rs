//! The login gate in front of the data commands.
//!
//! Credentials live in `.secrets/login.json` and are compared against the
//! username/password supplied on the command line (or via `SITELEDGER_USER` /
//! `SITELEDGER_PASSWORD`). Session-scoped: each invocation checks once, there is no
//! token or expiry logic.

use crate::error::{ErrorKind, IntoResult};
use crate::{utils, Config, Result};
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct LoginFile {
    username: String,
    password: String,
}

impl LoginFile {
    async fn load(path: &Path) -> Result<Self> {
        utils::deserialize(path).await.with_context(|| {
            format!(
                "Login credentials are not configured at {}; \
                 run 'siteledger init' with --username and --password",
                path.display()
            )
        })
    }

    async fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("Unable to serialize login file")?;
        utils::write(path, data).await?;

        // 0600 on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(path, permissions)
                .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
        }
        Ok(())
    }
}

/// Writes the login credentials file.
pub(crate) async fn save_credentials(
    config: &Config,
    username: &str,
    password: &str,
) -> Result<()> {
    let file = LoginFile {
        username: username.to_string(),
        password: password.to_string(),
    };
    file.save(&config.login_path()).await
}

/// Verifies the supplied credentials against the configured ones. Data commands call
/// this before touching the store.
pub async fn require_login(
    config: &Config,
    username: Option<&str>,
    password: Option<&str>,
) -> Result<()> {
    let file = LoginFile::load(&config.login_path())
        .await
        .kind(ErrorKind::Connection)?;

    let (username, password) = match (username, password) {
        (Some(u), Some(p)) => (u, p),
        _ => {
            return Err(anyhow!(
                "A username and password are required; pass --username/--password \
                 or set SITELEDGER_USER and SITELEDGER_PASSWORD"
            ))
            .kind(ErrorKind::Validation)
        }
    };

    if username != file.username || password != file.password {
        return Err(anyhow!("Invalid username or password")).kind(ErrorKind::Validation);
    }
    Ok(())
}
