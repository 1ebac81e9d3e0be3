//! SQLite-backed record store.
//!
//! Two physical tables model any number of logical sheets: `sheets` holds
//! one row per table with its JSON-encoded header, `rows` holds the
//! append-only data with each record JSON-encoded in column order. Queries
//! are bound at runtime so no live database is needed at build time.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqlitePool;

use crate::error::AppError;
use crate::store::RecordStore;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the physical schema if absent. Run once at startup.
    pub async fn init(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sheets (
                name   TEXT PRIMARY KEY,
                header TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS rows (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                sheet      TEXT NOT NULL,
                data       TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn ensure_table(&self, table: &str, header: &[&str]) -> Result<(), AppError> {
        let header_json = serde_json::to_string(header)?;
        sqlx::query("INSERT OR IGNORE INTO sheets (name, header) VALUES (?1, ?2)")
            .bind(table)
            .bind(header_json)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn append(&self, table: &str, record: &[String]) -> Result<(), AppError> {
        let data = serde_json::to_string(record)?;
        sqlx::query("INSERT INTO rows (sheet, data, created_at) VALUES (?1, ?2, ?3)")
            .bind(table)
            .bind(data)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count_rows(&self, table: &str) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rows WHERE sheet = ?1")
            .bind(table)
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn in_memory_store() -> SqliteStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("failed to open in-memory sqlite");
        let store = SqliteStore::new(pool);
        store.init().await.expect("schema init failed");
        store
    }

    #[tokio::test]
    async fn test_ensure_table_is_idempotent() {
        let store = in_memory_store().await;
        store.ensure_table("T", &["A", "B"]).await.unwrap();
        store.ensure_table("T", &["A", "B"]).await.unwrap();
        assert_eq!(store.count_rows("T").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_append_and_count() {
        let store = in_memory_store().await;
        store.ensure_table("T", &["A", "B"]).await.unwrap();
        store
            .append("T", &["one".to_string(), "two".to_string()])
            .await
            .unwrap();
        store
            .append("T", &["three".to_string(), "four".to_string()])
            .await
            .unwrap();

        assert_eq!(store.count_rows("T").await.unwrap(), 2);
        assert_eq!(store.count_rows("other").await.unwrap(), 0);
    }
}
