//! OAuth 2.0 handling for the Sheets API.
//!
//! The consent flow is manual: we print the authorization URL, the user authorizes in
//! a browser and pastes the redirect URL (or bare code) back, and we exchange it for
//! tokens. After that, `TokenProvider` refreshes the access token silently from the
//! persisted refresh token whenever it is close to expiry.

use crate::api::files::{ClientSecretFile, TokenFile};
use crate::api::OAUTH_SCOPES;
use crate::Result;
use anyhow::Context;
use chrono::Utc;
use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    RedirectUrl, RefreshToken, Scope, TokenResponse, TokenUrl,
};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Refresh the access token when it expires within this many seconds.
const REFRESH_MARGIN_SECONDS: i64 = 60;

/// Fallback lifetime when the token endpoint omits `expires_in`.
const DEFAULT_TOKEN_LIFETIME_SECONDS: i64 = 3600;

type OauthClient = BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Supplies a valid access token for Sheets API calls, refreshing and re-persisting
/// the token file when needed.
pub(crate) struct TokenProvider {
    secret: ClientSecretFile,
    token: TokenFile,
    token_path: PathBuf,
}

impl TokenProvider {
    /// Loads the client secret and the persisted token. Fails with guidance to run
    /// `siteledger auth` when the token file does not exist yet.
    pub(crate) async fn load(client_secret_path: &Path, token_path: &Path) -> Result<Self> {
        let secret = ClientSecretFile::load(client_secret_path).await?;
        let token = TokenFile::load(token_path).await?;
        Ok(Self {
            secret,
            token,
            token_path: token_path.to_path_buf(),
        })
    }

    /// Returns a valid access token, refreshing it first if it is near expiry.
    pub(crate) async fn token_with_refresh(&mut self) -> Result<&str> {
        if self.token.expires_within(REFRESH_MARGIN_SECONDS) {
            debug!("Access token near expiry, refreshing");
            let refresh_token = self
                .token
                .refresh_token()
                .context(
                    "The access token is expired and no refresh token is stored; \
                     run 'siteledger auth' to re-authenticate",
                )?
                .to_string();

            let client = oauth_client(&self.secret)?;
            let response = client
                .exchange_refresh_token(&RefreshToken::new(refresh_token.clone()))
                .request_async(&http_client()?)
                .await
                .context("Failed to refresh the access token")?;

            let expiry = Utc::now()
                + chrono::Duration::seconds(
                    response
                        .expires_in()
                        .map(|d| d.as_secs() as i64)
                        .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECONDS),
                );
            // Google usually omits the refresh token on refresh; keep the old one.
            let new_refresh = response
                .refresh_token()
                .map(|t| t.secret().clone())
                .or(Some(refresh_token));
            self.token = TokenFile::new(
                response.access_token().secret().clone(),
                new_refresh,
                expiry,
            );
            self.token.save(&self.token_path).await?;
            debug!("Token refreshed, valid until {}", self.token.expiry());
        }
        Ok(self.token.access_token())
    }
}

/// Builds the authorization URL the user must visit to grant access.
pub(crate) async fn authorization_url(client_secret_path: &Path) -> Result<url::Url> {
    let secret = ClientSecretFile::load(client_secret_path).await?;
    let client = oauth_client(&secret)?;
    let (auth_url, _csrf) = client
        .authorize_url(CsrfToken::new_random)
        .add_scopes(OAUTH_SCOPES.iter().map(|s| Scope::new(s.to_string())))
        .add_extra_param("access_type", "offline")
        .add_extra_param("prompt", "consent")
        .url();
    Ok(auth_url)
}

/// Exchanges a pasted authorization code for tokens and persists them.
pub(crate) async fn exchange_code(
    client_secret_path: &Path,
    token_path: &Path,
    code: String,
) -> Result<()> {
    let secret = ClientSecretFile::load(client_secret_path).await?;
    let client = oauth_client(&secret)?;
    let response = client
        .exchange_code(AuthorizationCode::new(code))
        .request_async(&http_client()?)
        .await
        .context("Failed to exchange the authorization code for a token")?;

    let expiry = Utc::now()
        + chrono::Duration::seconds(
            response
                .expires_in()
                .map(|d| d.as_secs() as i64)
                .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECONDS),
        );
    let token = TokenFile::new(
        response.access_token().secret().clone(),
        response.refresh_token().map(|t| t.secret().clone()),
        expiry,
    );
    token.save(token_path).await?;
    Ok(())
}

/// Extracts the authorization code from whatever the user pasted: either the full
/// redirect URL (with a `code` query parameter) or the bare code itself.
pub(crate) fn parse_authorization_code(input: &str) -> Result<String> {
    let trimmed = input.trim();
    anyhow::ensure!(!trimmed.is_empty(), "No authorization code was provided");

    if trimmed.contains("://") {
        let parsed = url::Url::parse(trimmed)
            .with_context(|| format!("Could not parse the pasted URL '{trimmed}'"))?;
        let code = parsed
            .query_pairs()
            .find(|(k, _)| k == "code")
            .map(|(_, v)| v.into_owned())
            .context("The pasted URL has no 'code' query parameter")?;
        return Ok(code);
    }
    Ok(trimmed.to_string())
}

fn oauth_client(secret: &ClientSecretFile) -> Result<OauthClient> {
    let client = BasicClient::new(ClientId::new(secret.client_id().to_string()))
        .set_client_secret(ClientSecret::new(secret.client_secret().to_string()))
        .set_auth_uri(
            AuthUrl::new(secret.auth_uri().to_string()).context("Invalid auth_uri")?,
        )
        .set_token_uri(
            TokenUrl::new(secret.token_uri().to_string()).context("Invalid token_uri")?,
        )
        .set_redirect_uri(
            RedirectUrl::new(secret.redirect_uri()?.to_string())
                .context("Invalid redirect URI")?,
        );
    Ok(client)
}

fn http_client() -> Result<reqwest::Client> {
    // The token endpoint must not be followed through redirects.
    reqwest::ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .context("Failed to build the HTTP client")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_code_from_redirect_url() {
        let input = "http://localhost/?state=xyz&code=4%2F0Axyz-abc&scope=spreadsheets";
        let code = parse_authorization_code(input).unwrap();
        assert_eq!(code, "4/0Axyz-abc");
    }

    #[test]
    fn test_parse_bare_code() {
        let code = parse_authorization_code("  4/0Axyz-abc \n").unwrap();
        assert_eq!(code, "4/0Axyz-abc");
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_authorization_code("   ").is_err());
    }

    #[test]
    fn test_parse_url_without_code() {
        assert!(parse_authorization_code("http://localhost/?state=xyz").is_err());
    }
}
