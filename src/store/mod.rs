//! Analysis record storage with SQLite
//!
//! The correlation engine only needs key-value semantics: get all, get one,
//! put, delete. `RecordStore` captures that contract; `SqliteStore` is the
//! local implementation. Records with unreadable output are returned with
//! `output = None` rather than failing the whole fetch — a malformed row is
//! zero signal, not an error.

mod schema;

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use tokio::sync::Mutex;
use tracing::warn;

use crate::record::{AnalysisInput, AnalysisOutput, AnalysisRecord, RecordStatus};

pub use schema::SCHEMA;

/// Async key-value contract over the record collection.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every stored record, newest first. An empty store returns an empty
    /// vec, never an error.
    async fn get_all_results(&self) -> Result<Vec<AnalysisRecord>>;

    async fn get_result(&self, id: &str) -> Result<Option<AnalysisRecord>>;

    /// Insert or replace by id.
    async fn put_result(&self, record: &AnalysisRecord) -> Result<()>;

    /// Returns whether a record was actually removed.
    async fn delete_result(&self, id: &str) -> Result<bool>;
}

pub struct SqliteStore {
    // rusqlite connections are not Sync; the store is shared across
    // concurrent queries, so access is serialized here.
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {}", path.display()))?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Transient store for tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<(AnalysisRecord, Option<String>)> {
    let id: String = row.get(0)?;
    let status: String = row.get(1)?;
    let query: String = row.get(2)?;
    let target_url: Option<String> = row.get(3)?;
    let created_at: i64 = row.get(4)?;
    let output_json: Option<String> = row.get(5)?;

    let record = AnalysisRecord {
        id,
        status: RecordStatus::parse(&status).unwrap_or(RecordStatus::Error),
        input: AnalysisInput {
            query,
            target_url: target_url.unwrap_or_default(),
            timestamp: created_at,
        },
        output: None,
    };
    Ok((record, output_json))
}

fn attach_output(pair: (AnalysisRecord, Option<String>)) -> AnalysisRecord {
    let (mut record, output_json) = pair;
    if let Some(json) = output_json {
        match serde_json::from_str::<AnalysisOutput>(&json) {
            Ok(output) => record.output = Some(output),
            Err(e) => warn!(record = %record.id, error = %e, "unreadable output column, treating as absent"),
        }
    }
    record
}

const SELECT_COLUMNS: &str = "id, status, query, target_url, created_at, output";

#[async_trait]
impl RecordStore for SqliteStore {
    async fn get_all_results(&self) -> Result<Vec<AnalysisRecord>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM records ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map([], row_to_record)?;

        let records = rows
            .collect::<std::result::Result<Vec<_>, _>>()?
            .into_iter()
            .map(attach_output)
            .collect();
        Ok(records)
    }

    async fn get_result(&self, id: &str) -> Result<Option<AnalysisRecord>> {
        let conn = self.conn.lock().await;
        let row = conn.query_row(
            &format!("SELECT {SELECT_COLUMNS} FROM records WHERE id = ?"),
            params![id],
            row_to_record,
        );

        match row {
            Ok(pair) => Ok(Some(attach_output(pair))),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put_result(&self, record: &AnalysisRecord) -> Result<()> {
        let output_json = record
            .output
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .context("failed to serialize analysis output")?;

        let conn = self.conn.lock().await;
        conn.execute(
            r#"INSERT INTO records (id, status, query, target_url, created_at, output, indexed_at)
               VALUES (?, ?, ?, ?, ?, ?, datetime('now'))
               ON CONFLICT(id) DO UPDATE SET
                   status = excluded.status,
                   query = excluded.query,
                   target_url = excluded.target_url,
                   created_at = excluded.created_at,
                   output = excluded.output,
                   indexed_at = datetime('now')"#,
            params![
                record.id,
                record.status.as_str(),
                record.input.query,
                record.input.target_url,
                record.input.timestamp,
                output_json,
            ],
        )?;
        Ok(())
    }

    async fn delete_result(&self, id: &str) -> Result<bool> {
        let conn = self.conn.lock().await;
        let affected = conn.execute("DELETE FROM records WHERE id = ?", params![id])?;
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{AnalysisOutput, NameLike};

    fn sample(id: &str, timestamp: i64) -> AnalysisRecord {
        AnalysisRecord {
            id: id.to_string(),
            status: RecordStatus::Completed,
            input: AnalysisInput {
                query: "flight logs 2002".to_string(),
                target_url: "https://example.org/docs".to_string(),
                timestamp,
            },
            output: Some(AnalysisOutput {
                context_summary: "summary".to_string(),
                key_entities: vec![NameLike::from("Jeffrey Epstein")],
                ..Default::default()
            }),
        }
    }

    #[tokio::test]
    async fn put_then_get_roundtrips() {
        let store = SqliteStore::in_memory().unwrap();
        store.put_result(&sample("r1", 1000)).await.unwrap();

        let record = store.get_result("r1").await.unwrap().unwrap();
        assert_eq!(record.status, RecordStatus::Completed);
        assert_eq!(record.input.query, "flight logs 2002");
        assert_eq!(record.output.unwrap().key_entities.len(), 1);
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.get_result("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.get_all_results().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_all_orders_newest_first() {
        let store = SqliteStore::in_memory().unwrap();
        store.put_result(&sample("old", 1000)).await.unwrap();
        store.put_result(&sample("new", 2000)).await.unwrap();

        let records = store.get_all_results().await.unwrap();
        assert_eq!(records[0].id, "new");
        assert_eq!(records[1].id, "old");
    }

    #[tokio::test]
    async fn put_upserts_by_id() {
        let store = SqliteStore::in_memory().unwrap();
        store.put_result(&sample("r1", 1000)).await.unwrap();

        let mut updated = sample("r1", 1000);
        updated.status = RecordStatus::Error;
        updated.output = None;
        store.put_result(&updated).await.unwrap();

        let records = store.get_all_results().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, RecordStatus::Error);
        assert!(records[0].output.is_none());
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_was_removed() {
        let store = SqliteStore::in_memory().unwrap();
        store.put_result(&sample("r1", 1000)).await.unwrap();

        assert!(store.delete_result("r1").await.unwrap());
        assert!(!store.delete_result("r1").await.unwrap());
    }

    #[tokio::test]
    async fn open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/casefile.db");
        let store = SqliteStore::open(&path).unwrap();
        store.put_result(&sample("r1", 1000)).await.unwrap();
        assert!(path.exists());
    }
}
