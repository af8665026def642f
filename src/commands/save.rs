//! Save command handler.

use crate::api::{self, Mode};
use crate::args::SaveArgs;
use crate::commands::Out;
use crate::error::{ErrorKind, IntoResult};
use crate::model::{sort_by_date, SortOrder, Table};
use crate::{utils, Config, Result};
use anyhow::{anyhow, Context};

/// Replaces the whole ledger with an edited table read from a CSV file. The
/// replacement is sorted newest-first and renumbered before it is written.
pub async fn save(config: Config, mode: Mode, args: SaveArgs) -> Result<Out<String>> {
    let contents = utils::read(args.file()).await.kind(ErrorKind::Validation)?;
    let values = parse_csv(&contents)
        .with_context(|| format!("Could not parse CSV file at {}", args.file().display()))
        .kind(ErrorKind::Validation)?;
    if values.is_empty() {
        return Err(anyhow!(
            "The replacement table must include the header row"
        ))
        .kind(ErrorKind::Validation);
    }
    let table = Table::new(values)?;
    let sorted = sort_by_date(&table, SortOrder::NewestFirst);

    let mut sheet = api::sheet(&config, mode).await?;
    sheet.replace_all(&sorted.to_values()).await?;

    let message = format!("Saved the ledger with {} expense rows", sorted.len());
    Ok(Out::new(message, args.file().display().to_string()))
}

/// Parses CSV text into a raw value grid. Rows may be ragged; the reader does not
/// treat the first row specially.
fn parse_csv(contents: &str) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(contents.as_bytes());
    let mut values = Vec::new();
    for record in reader.records() {
        let record = record.context("Invalid CSV record")?;
        values.push(record.iter().map(|s| s.to_string()).collect());
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_kind;
    use crate::test::TestEnv;

    const EDITED: &str = "\
Sl No,Date,Item Description,Vendor,Bill Number,Amount
1,01/01/2024,Cement,ABC Co,B1,100.00
2,15/01/2024,Sand,XYZ Co,N/A,50.00
";

    #[tokio::test]
    async fn test_save_replaces_sorted() {
        let env = TestEnv::new().await;
        env.seed();

        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("edited.csv");
        std::fs::write(&file, EDITED).unwrap();

        let out = save(env.config(), Mode::Test, SaveArgs::new(&file))
            .await
            .unwrap();
        assert!(out.message().contains("2 expense rows"));

        let state = env.get_state();
        assert_eq!(state.len(), 3);
        assert_eq!(state[1][1], "15/01/2024");
        assert_eq!(state[1][0], "1");
        assert_eq!(state[2][1], "01/01/2024");
    }

    #[tokio::test]
    async fn test_save_missing_file() {
        let env = TestEnv::new().await;
        let err = save(
            env.config(),
            Mode::Test,
            SaveArgs::new("/definitely/not/here.csv"),
        )
        .await
        .unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::Validation));
    }

    #[tokio::test]
    async fn test_save_empty_file() {
        let env = TestEnv::new().await;
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("empty.csv");
        std::fs::write(&file, "").unwrap();

        let err = save(env.config(), Mode::Test, SaveArgs::new(&file))
            .await
            .unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::Validation));
    }
}
