// Namespace stored as a row in a SQLite key/value table

use crate::backend::{Backend, validate_namespace};
use eyre::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use std::fs;
use std::path::Path;
use tracing::debug;

pub const DB_FILE: &str = "gamevault.db";

/// One row per namespace in `namespaces(key, value, revision, updated_at)`
pub struct SqliteBackend {
    db: Connection,
    namespace: String,
}

impl SqliteBackend {
    /// Open or create `<dir>/gamevault.db`
    pub fn open<P: AsRef<Path>>(dir: P, namespace: &str) -> Result<Self> {
        validate_namespace(namespace)?;
        fs::create_dir_all(dir.as_ref()).context("Failed to create store directory")?;

        let db_path = dir.as_ref().join(DB_FILE);
        let db = Connection::open(&db_path).context("Failed to open SQLite database")?;
        Self::with_connection(db, namespace)
    }

    /// Database that lives only as long as this backend
    pub fn in_memory(namespace: &str) -> Result<Self> {
        validate_namespace(namespace)?;
        let db = Connection::open_in_memory().context("Failed to open in-memory SQLite database")?;
        Self::with_connection(db, namespace)
    }

    fn with_connection(db: Connection, namespace: &str) -> Result<Self> {
        let backend = Self {
            db,
            namespace: namespace.to_string(),
        };
        backend.create_schema()?;
        Ok(backend)
    }

    fn create_schema(&self) -> Result<()> {
        debug!("Creating database schema");

        self.db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS namespaces (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                revision INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        Ok(())
    }
}

impl Backend for SqliteBackend {
    fn load(&self) -> Result<Option<String>> {
        let value = self
            .db
            .query_row(
                "SELECT value FROM namespaces WHERE key = ?1",
                [&self.namespace],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn persist(&mut self, payload: &str) -> Result<()> {
        let tx = self.db.transaction()?;

        tx.execute(
            "INSERT INTO namespaces (key, value, revision, updated_at)
             VALUES (?1, ?2, 1, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                revision = namespaces.revision + 1,
                updated_at = excluded.updated_at",
            rusqlite::params![&self.namespace, payload, chrono::Utc::now().timestamp_millis()],
        )?;

        tx.commit()?;
        debug!(namespace = %self.namespace, bytes = payload.len(), "Wrote namespace row");
        Ok(())
    }

    fn revision(&self) -> Result<Option<i64>> {
        let revision = self
            .db
            .query_row(
                "SELECT revision FROM namespaces WHERE key = ?1",
                [&self.namespace],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_database() {
        let temp = TempDir::new().unwrap();
        let _backend = SqliteBackend::open(temp.path(), "games").unwrap();
        assert!(temp.path().join(DB_FILE).exists());
    }

    #[test]
    fn test_absent_row_is_absent_slot() {
        let backend = SqliteBackend::in_memory("games").unwrap();
        assert_eq!(backend.load().unwrap(), None);
        assert_eq!(backend.revision().unwrap(), None);
    }

    #[test]
    fn test_persist_bumps_revision() {
        let mut backend = SqliteBackend::in_memory("games").unwrap();

        backend.persist("[]").unwrap();
        assert_eq!(backend.revision().unwrap(), Some(1));

        backend.persist(r#"[{"id":"a"}]"#).unwrap();
        assert_eq!(backend.revision().unwrap(), Some(2));
        assert_eq!(backend.load().unwrap().as_deref(), Some(r#"[{"id":"a"}]"#));
    }

    #[test]
    fn test_reopen_sees_previous_writes() {
        let temp = TempDir::new().unwrap();
        {
            let mut backend = SqliteBackend::open(temp.path(), "games").unwrap();
            backend.persist("[]").unwrap();
        }

        let backend = SqliteBackend::open(temp.path(), "games").unwrap();
        assert_eq!(backend.load().unwrap().as_deref(), Some("[]"));
        assert_eq!(backend.revision().unwrap(), Some(1));
    }

    #[test]
    fn test_namespaces_share_a_database() {
        let temp = TempDir::new().unwrap();
        let mut games = SqliteBackend::open(temp.path(), "games").unwrap();
        let wishlist = SqliteBackend::open(temp.path(), "wishlist").unwrap();

        games.persist("[]").unwrap();
        assert_eq!(wishlist.load().unwrap(), None);
    }
}
