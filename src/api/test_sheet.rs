//! Implements the `Sheet` trait using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can
//! run the whole app, top-to-bottom, without using Google Sheets. State is held
//! process-wide, keyed by spreadsheet id, so that commands (which construct their own
//! `Sheet`) observe the rows a test seeded.

use crate::api::Sheet;
use crate::Result;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Mutex, OnceLock};

static STATE: OnceLock<Mutex<HashMap<String, Vec<Vec<String>>>>> = OnceLock::new();

fn state() -> &'static Mutex<HashMap<String, Vec<Vec<String>>>> {
    STATE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// An implementation of the `Sheet` trait that does not use Google sheets.
pub(crate) struct TestSheet {
    spreadsheet_id: String,
}

impl TestSheet {
    pub(crate) fn new(spreadsheet_id: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
        }
    }

    /// The rows currently held for this spreadsheet id; empty when never written.
    pub(crate) fn get_state(&self) -> Vec<Vec<String>> {
        state()
            .lock()
            .unwrap()
            .get(&self.spreadsheet_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Replaces the rows held for this spreadsheet id.
    pub(crate) fn set_state(&self, values: Vec<Vec<String>>) {
        state()
            .lock()
            .unwrap()
            .insert(self.spreadsheet_id.clone(), values);
    }

    /// Seeds this spreadsheet id with a small ledger.
    pub(crate) fn seed(&self) {
        self.set_state(load_csv(SEED_DATA).unwrap());
    }
}

#[async_trait::async_trait]
impl Sheet for TestSheet {
    async fn fetch_all(&mut self) -> Result<Vec<Vec<String>>> {
        Ok(self.get_state())
    }

    async fn replace_all(&mut self, values: &[Vec<String>]) -> Result<()> {
        self.set_state(values.to_vec());
        Ok(())
    }

    async fn append_row(&mut self, row: &[String]) -> Result<()> {
        let mut guard = state().lock().unwrap();
        guard
            .entry(self.spreadsheet_id.clone())
            .or_default()
            .push(row.to_vec());
        Ok(())
    }
}

/// Loads data from a CSV-formatted string.
fn load_csv(csv_data: &str) -> Result<Vec<Vec<String>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false) // Ensure headers are treated as part of the data
        .flexible(true)
        .from_reader(Cursor::new(csv_data.as_bytes()));

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }
    Ok(rows)
}

/// Seed ledger data.
const SEED_DATA: &str = r##"Sl No,Date,Item Description,Vendor,Bill Number,Amount
1,20/03/2024,Ready-mix concrete M25,Sagar Builders Supply,SB-1042,48500.00
2,14/03/2024,River sand 2 units,Krishna Sand Depot,KS-221,17200.00
3,14/03/2024,TMT steel bars 12mm,Balaji Steel Traders,BST-877,92300.50
4,02/03/2024,Electrical conduit and boxes,Sharma Electricals,N/A,6450.00
5,25/02/2024,Bricks 5000 nos,Lakshmi Brick Works,LBW-310,32500.00
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_state_round_trip() {
        let mut sheet = TestSheet::new("test-sheet-round-trip");
        assert!(sheet.fetch_all().await.unwrap().is_empty());

        let values = vec![
            vec!["Sl No".to_string(), "Date".to_string()],
            vec!["1".to_string(), "01/01/2024".to_string()],
        ];
        sheet.replace_all(&values).await.unwrap();
        assert_eq!(sheet.fetch_all().await.unwrap(), values);

        sheet
            .append_row(&["2".to_string(), "02/01/2024".to_string()])
            .await
            .unwrap();
        assert_eq!(sheet.fetch_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_append_to_empty_sheet() {
        let mut sheet = TestSheet::new("test-sheet-append-empty");
        sheet.append_row(&["Sl No".to_string()]).await.unwrap();
        assert_eq!(sheet.get_state(), vec![vec!["Sl No".to_string()]]);
    }

    #[test]
    fn test_seed_parses() {
        let sheet = TestSheet::new("test-sheet-seed");
        sheet.seed();
        let rows = sheet.get_state();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0][0], "Sl No");
        assert_eq!(rows[3][4], "BST-877");
    }

    #[test]
    fn test_ids_are_isolated() {
        let a = TestSheet::new("test-sheet-iso-a");
        let b = TestSheet::new("test-sheet-iso-b");
        a.set_state(vec![vec!["x".to_string()]]);
        assert!(b.get_state().is_empty());
    }
}
