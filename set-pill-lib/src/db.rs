// set-pill-lib/src/db.rs
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DB_FILE_NAME: &str = "history.sqlite";
const APP_DATA_DIR: &str = "set-pill"; // Same dir name as config

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database connection failed")]
    Connection(#[from] rusqlite::Error),
    #[error("Failed to get application data directory")]
    DataDir,
    #[error("I/O error accessing database file")]
    Io(#[from] std::io::Error),
    #[error("Database query failed: {0}")]
    QueryFailed(rusqlite::Error),
    #[error("Database write failed: {0}")]
    WriteFailed(rusqlite::Error),
    #[error("Failed to encode stored value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Minimal persistence contract: opaque string values under fixed keys.
pub trait KeyValueStore {
    /// # Errors
    /// Returns `DbError` if the backing storage cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, DbError>;
    /// # Errors
    /// Returns `DbError` if the value cannot be stored.
    fn write(&mut self, key: &str, value: &str) -> Result<(), DbError>;
    /// # Errors
    /// Returns `DbError` if the key cannot be removed.
    fn remove(&mut self, key: &str) -> Result<(), DbError>;
}

/// Determines the path to the database file, creating its directory.
/// # Errors
/// Returns `DbError::DataDir` if no data directory exists for this platform.
pub fn get_db_path() -> Result<PathBuf, DbError> {
    let data_dir = dirs::data_dir().ok_or(DbError::DataDir)?;
    let app_dir = data_dir.join(APP_DATA_DIR);
    if !app_dir.exists() {
        std::fs::create_dir_all(&app_dir)?;
    }
    Ok(app_dir.join(DB_FILE_NAME))
}

/// # Errors
/// Returns `DbError::Connection` if SQLite cannot open the file.
pub fn open_db<P: AsRef<Path>>(path: P) -> Result<Connection, DbError> {
    let conn = Connection::open(path).map_err(DbError::Connection)?;
    Ok(conn)
}

/// # Errors
/// Returns `DbError::Connection` if the schema cannot be created.
pub fn init_db(conn: &Connection) -> Result<(), DbError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS key_values (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL
        )",
        [],
    )
    .map_err(DbError::Connection)?;
    Ok(())
}

/// `KeyValueStore` backed by a single SQLite table.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and ensures the schema.
    /// # Errors
    /// Returns `DbError` if the file cannot be opened or initialised.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        let conn = open_db(path)?;
        init_db(&conn)?;
        Ok(Self { conn })
    }

    /// # Errors
    /// Returns `DbError` if the in-memory database cannot be initialised.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory().map_err(DbError::Connection)?;
        init_db(&conn)?;
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteStore {
    fn read(&self, key: &str) -> Result<Option<String>, DbError> {
        self.conn
            .query_row(
                "SELECT value FROM key_values WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(DbError::QueryFailed)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), DbError> {
        self.conn
            .execute(
                "INSERT INTO key_values (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map_err(DbError::WriteFailed)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), DbError> {
        self.conn
            .execute("DELETE FROM key_values WHERE key = ?1", params![key])
            .map_err(DbError::WriteFailed)?;
        Ok(())
    }
}

/// In-process `KeyValueStore`, for tests and throwaway sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a raw value, bypassing any encoding.
    pub fn insert(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, DbError> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), DbError> {
        self.insert(key, value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), DbError> {
        self.values.remove(key);
        Ok(())
    }
}
