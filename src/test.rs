//! Test support: a temporary siteledger home plus an isolated in-memory sheet.

use crate::api::TestSheet;
use crate::{utils, Config};
use tempfile::TempDir;
use uuid::Uuid;

/// A fresh home directory with a written config, backed by an in-memory sheet whose
/// spreadsheet id is unique to this instance.
pub(crate) struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    pub(crate) async fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let secret_path = temp_dir.path().join("downloaded_client_secret.json");
        utils::write(&secret_path, STUB_CLIENT_SECRET)
            .await
            .expect("write stub client secret");

        let spreadsheet_id = Uuid::new_v4().simple().to_string();
        let sheet_url = format!("https://docs.google.com/spreadsheets/d/{spreadsheet_id}/edit");
        let home = temp_dir.path().join("home");
        let config = Config::create(&home, &secret_path, &sheet_url, None)
            .await
            .expect("create config");

        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    pub(crate) fn config(&self) -> Config {
        self.config.clone()
    }

    fn sheet(&self) -> TestSheet {
        TestSheet::new(self.config.spreadsheet_id())
    }

    /// The rows currently held in the in-memory sheet.
    pub(crate) fn get_state(&self) -> Vec<Vec<String>> {
        self.sheet().get_state()
    }

    /// Replaces the rows held in the in-memory sheet.
    pub(crate) fn set_state(&self, values: Vec<Vec<String>>) {
        self.sheet().set_state(values)
    }

    /// Seeds the in-memory sheet with the canned five-row ledger.
    pub(crate) fn seed(&self) {
        self.sheet().seed()
    }
}

const STUB_CLIENT_SECRET: &str = r#"{
  "installed": {
    "client_id": "stub-client-id.apps.googleusercontent.com",
    "client_secret": "stub-client-secret",
    "auth_uri": "https://accounts.google.com/o/oauth2/auth",
    "token_uri": "https://oauth2.googleapis.com/token",
    "redirect_uris": ["http://localhost"]
  }
}"#;
