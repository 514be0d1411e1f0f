use log::info;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        username      TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS sessions (
        token      TEXT PRIMARY KEY,
        user_id    INTEGER NOT NULL,
        created_at TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS templates (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        name          TEXT NOT NULL,
        description   TEXT NOT NULL DEFAULT '',
        template_text TEXT NOT NULL,
        created_at    TEXT NOT NULL,
        last_modified TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS generated_documents (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        template_id INTEGER NOT NULL,
        filename    TEXT NOT NULL,
        created_at  TEXT NOT NULL,
        meta        TEXT NOT NULL DEFAULT '{}'
    );
    CREATE INDEX IF NOT EXISTS idx_generated_template ON generated_documents (template_id);
";

/// Handle to the SQLite database file.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    /// Opens the database at `path`, creating the file and schema if needed.
    pub fn open(path: impl Into<PathBuf>) -> rusqlite::Result<Self> {
        let db = Self { path: path.into() };
        db.connect()?.execute_batch(SCHEMA)?;
        info!("Database ready at {}", db.path.display());
        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(super) fn connect(&self) -> rusqlite::Result<Connection> {
        Connection::open(&self.path)
    }
}
