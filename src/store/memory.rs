//! In-memory record store for tests and ephemeral deployments.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::store::RecordStore;

#[derive(Default)]
struct Sheet {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

#[derive(Default)]
pub struct MemoryStore {
    sheets: Mutex<HashMap<String, Sheet>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a table's data rows, for assertions.
    pub async fn rows(&self, table: &str) -> Vec<Vec<String>> {
        let sheets = self.sheets.lock().await;
        sheets.get(table).map(|s| s.rows.clone()).unwrap_or_default()
    }

    /// Header a table was created with, for assertions.
    pub async fn header(&self, table: &str) -> Vec<String> {
        let sheets = self.sheets.lock().await;
        sheets.get(table).map(|s| s.header.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn ensure_table(&self, table: &str, header: &[&str]) -> Result<(), AppError> {
        let mut sheets = self.sheets.lock().await;
        sheets.entry(table.to_string()).or_insert_with(|| Sheet {
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        });
        Ok(())
    }

    async fn append(&self, table: &str, record: &[String]) -> Result<(), AppError> {
        let mut sheets = self.sheets.lock().await;
        sheets
            .entry(table.to_string())
            .or_default()
            .rows
            .push(record.to_vec());
        Ok(())
    }

    async fn count_rows(&self, table: &str) -> Result<u64, AppError> {
        let sheets = self.sheets.lock().await;
        Ok(sheets.get(table).map(|s| s.rows.len() as u64).unwrap_or(0))
    }
}
