//! Serialization formats for the files in `.secrets`: the downloaded OAuth client
//! credentials and the persisted token.

use crate::{utils, Result};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The Google "installed application" OAuth client credentials file, exactly as
/// downloaded from the Google Cloud console.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ClientSecretFile {
    installed: InstalledSecret,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct InstalledSecret {
    client_id: String,
    client_secret: String,
    auth_uri: String,
    token_uri: String,
    redirect_uris: Vec<String>,
}

impl ClientSecretFile {
    pub(crate) async fn load(path: &Path) -> Result<Self> {
        utils::deserialize(path)
            .await
            .with_context(|| format!("Failed to load client secret from {}", path.display()))
    }

    pub(crate) fn client_id(&self) -> &str {
        &self.installed.client_id
    }

    pub(crate) fn client_secret(&self) -> &str {
        &self.installed.client_secret
    }

    pub(crate) fn auth_uri(&self) -> &str {
        &self.installed.auth_uri
    }

    pub(crate) fn token_uri(&self) -> &str {
        &self.installed.token_uri
    }

    /// The first registered redirect URI. The consent flow pastes the redirect back
    /// manually, so any registered URI works.
    pub(crate) fn redirect_uri(&self) -> Result<&str> {
        self.installed
            .redirect_uris
            .first()
            .map(|s| s.as_str())
            .context("The client secret file lists no redirect URIs")
    }
}

/// The persisted OAuth token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TokenFile {
    access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    expiry: DateTime<Utc>,
}

impl TokenFile {
    pub(crate) fn new(
        access_token: String,
        refresh_token: Option<String>,
        expiry: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            expiry,
        }
    }

    pub(crate) async fn load(path: &Path) -> Result<Self> {
        utils::deserialize(path).await.with_context(|| {
            format!(
                "Failed to load token from {}; run 'siteledger auth' to authenticate",
                path.display()
            )
        })
    }

    /// Saves the token with restrictive file permissions.
    pub(crate) async fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize token")?;
        utils::write(path, content).await?;

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

    pub(crate) fn access_token(&self) -> &str {
        &self.access_token
    }

    pub(crate) fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub(crate) fn expiry(&self) -> DateTime<Utc> {
        self.expiry
    }

    /// True when the token expires within `margin_seconds` from now.
    pub(crate) fn expires_within(&self, margin_seconds: i64) -> bool {
        self.expiry - Utc::now() < chrono::Duration::seconds(margin_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_client_secret_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("client_secret.json");
        let json = r#"{
            "installed": {
                "client_id": "id-123",
                "client_secret": "secret-456",
                "auth_uri": "https://accounts.google.com/o/oauth2/auth",
                "token_uri": "https://oauth2.googleapis.com/token",
                "redirect_uris": ["http://localhost"]
            }
        }"#;
        std::fs::write(&path, json).unwrap();

        let secret = ClientSecretFile::load(&path).await.unwrap();
        assert_eq!(secret.client_id(), "id-123");
        assert_eq!(secret.client_secret(), "secret-456");
        assert_eq!(secret.redirect_uri().unwrap(), "http://localhost");
    }

    #[tokio::test]
    async fn test_token_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("token.json");
        let token = TokenFile::new(
            "access".to_string(),
            Some("refresh".to_string()),
            Utc::now() + chrono::Duration::hours(1),
        );
        token.save(&path).await.unwrap();

        let loaded = TokenFile::load(&path).await.unwrap();
        assert_eq!(loaded.access_token(), "access");
        assert_eq!(loaded.refresh_token(), Some("refresh"));
        assert!(!loaded.expires_within(60));
    }

    #[test]
    fn test_expires_within() {
        let stale = TokenFile::new(
            "t".to_string(),
            None,
            Utc::now() + chrono::Duration::seconds(30),
        );
        assert!(stale.expires_within(60));

        let fresh = TokenFile::new(
            "t".to_string(),
            None,
            Utc::now() + chrono::Duration::hours(1),
        );
        assert!(!fresh.expires_within(60));
    }
}
