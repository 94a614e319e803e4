use std::fs;
use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

use crate::error::{Error, Result};

/// SQLite file name stored inside the application data directory.
pub const DB_FILE_NAME: &str = "records.sqlite";

/// Ensure the data directory and database file exist, create the key-value
/// table, and return a live connection.
pub fn open_store(data_dir: &Path) -> Result<Connection> {
    fs::create_dir_all(data_dir).map_err(|source| Error::DirectoryCreate {
        path: data_dir.to_path_buf(),
        source,
    })?;

    let db_path = data_dir.join(DB_FILE_NAME);
    let conn = Connection::open(&db_path).map_err(|source| Error::DatabaseOpen {
        path: db_path.clone(),
        source,
    })?;
    ensure_schema(&conn)?;
    debug!(path = %db_path.display(), "opened record store");
    Ok(conn)
}

/// Throwaway store used by tests and previews.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
        path: ":memory:".into(),
        source,
    })?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// One row per slot; the whole record collection lives in a single value.
fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_store_creates_nested_data_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let data_dir = tmp.path().join("nested").join("data");
        let conn = open_store(&data_dir).unwrap();
        assert!(data_dir.join(DB_FILE_NAME).exists());

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'kv_store'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }

    #[test]
    fn schema_creation_is_idempotent() {
        let conn = open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();
    }
}
