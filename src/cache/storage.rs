//! Cache storage trait and SQLite implementation.

use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Error, Result};

/// Trait for durable key-value storage backends.
///
/// Values are opaque strings; the cache layer serializes entries to JSON
/// before handing them over. Writes replace the whole value for a key.
pub trait CacheStorage: Send + Sync {
  /// Read the value stored under `key`, if any.
  fn get(&self, key: &str) -> Result<Option<String>>;

  /// Store `value` under `key`, replacing any previous value.
  fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Storage implementation that doesn't cache anything.
/// Used when caching is disabled - all operations are no-ops.
pub struct NoopStorage;

impl CacheStorage for NoopStorage {
  fn get(&self, _key: &str) -> Result<Option<String>> {
    Ok(None) // Always miss
  }

  fn set(&self, _key: &str, _value: &str) -> Result<()> {
    Ok(()) // Discard
  }
}

/// Process-local storage, lost on exit.
#[derive(Default)]
pub struct MemoryStorage {
  values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }
}

impl CacheStorage for MemoryStorage {
  fn get(&self, key: &str) -> Result<Option<String>> {
    let values = self.values.lock().map_err(|_| Error::StorageLock)?;
    Ok(values.get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> Result<()> {
    let mut values = self.values.lock().map_err(|_| Error::StorageLock)?;
    values.insert(key.to_string(), value.to_string());
    Ok(())
  }
}

/// SQLite-based cache storage implementation.
pub struct SqliteStorage {
  conn: Mutex<Connection>,
}

impl SqliteStorage {
  /// Open the cache database at `path`, or at the default location.
  pub fn open(path: Option<&Path>) -> Result<Self> {
    let path = match path {
      Some(p) => p.to_path_buf(),
      None => Self::default_path()?,
    };

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(&path)?;
    tracing::debug!(path = %path.display(), "opened cache database");
    Self::with_connection(conn)
  }

  /// Open a throwaway in-memory database.
  pub fn open_in_memory() -> Result<Self> {
    Self::with_connection(Connection::open_in_memory()?)
  }

  fn with_connection(conn: Connection) -> Result<Self> {
    let storage = Self {
      conn: Mutex::new(conn),
    };
    storage.run_migrations()?;
    Ok(storage)
  }

  /// Get the default database path.
  fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| {
        Error::Io(std::io::Error::new(
          std::io::ErrorKind::NotFound,
          "could not determine data directory",
        ))
      })?;

    Ok(data_dir.join("storefront").join("cache.db"))
  }

  /// Run database migrations for cache tables.
  fn run_migrations(&self) -> Result<()> {
    let conn = self.conn.lock().map_err(|_| Error::StorageLock)?;
    conn.execute_batch(CACHE_SCHEMA)?;
    Ok(())
  }
}

/// Schema for cache tables.
const CACHE_SCHEMA: &str = r#"
-- One row per cache key; value is the serialized cache entry
CREATE TABLE IF NOT EXISTS kv_cache (
    cache_key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    written_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

impl CacheStorage for SqliteStorage {
  fn get(&self, key: &str) -> Result<Option<String>> {
    let conn = self.conn.lock().map_err(|_| Error::StorageLock)?;

    let value = conn
      .query_row(
        "SELECT value FROM kv_cache WHERE cache_key = ?",
        params![key],
        |row| row.get(0),
      )
      .optional()?;

    Ok(value)
  }

  fn set(&self, key: &str, value: &str) -> Result<()> {
    let conn = self.conn.lock().map_err(|_| Error::StorageLock)?;

    conn.execute(
      "INSERT OR REPLACE INTO kv_cache (cache_key, value, written_at)
       VALUES (?, ?, datetime('now'))",
      params![key, value],
    )?;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_noop_always_misses() {
    let storage = NoopStorage;
    storage.set("books", "[]").unwrap();
    assert_eq!(storage.get("books").unwrap(), None);
  }

  #[test]
  fn test_memory_overwrites() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.get("books").unwrap(), None);

    storage.set("books", "first").unwrap();
    storage.set("books", "second").unwrap();
    assert_eq!(storage.get("books").unwrap().as_deref(), Some("second"));
  }

  #[test]
  fn test_sqlite_get_set() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    assert_eq!(storage.get("categories").unwrap(), None);

    storage.set("categories", r#"{"a":1}"#).unwrap();
    storage.set("books", "[]").unwrap();
    storage.set("categories", r#"{"a":2}"#).unwrap();

    assert_eq!(
      storage.get("categories").unwrap().as_deref(),
      Some(r#"{"a":2}"#)
    );
    assert_eq!(storage.get("books").unwrap().as_deref(), Some("[]"));
  }

  #[test]
  fn test_sqlite_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("cache.db");

    {
      let storage = SqliteStorage::open(Some(&path)).unwrap();
      storage.set("books", "payload").unwrap();
    }

    let reopened = SqliteStorage::open(Some(&path)).unwrap();
    assert_eq!(reopened.get("books").unwrap().as_deref(), Some("payload"));
  }
}
