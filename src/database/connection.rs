/*!
 * Shared handle on the SQLite question store.
 *
 * File stores are opened read-only; all work runs on the blocking pool
 * when called from async code.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::schema;

/// Default database filename, as written by the question loader
pub const DEFAULT_DB_FILENAME: &str = "enem_questions.db";

/// Cloneable handle; clones share one SQLite connection
#[derive(Clone)]
pub struct DatabaseConnection {
    /// Store location, `:memory:` for in-memory stores
    db_path: PathBuf,
    connection: Arc<Mutex<Connection>>,
}

impl DatabaseConnection {
    /// Open an existing question store in read-only mode
    ///
    /// The store is populated by an external loader, so the file must exist
    /// and already contain every catalog table.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        if !db_path.is_file() {
            return Err(anyhow::anyhow!("Database file not found: {:?}", db_path));
        }

        info!("Opening question store at: {:?}", db_path);

        let conn = Connection::open_with_flags(
            &db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open database: {:?}", db_path))?;

        schema::verify_schema(&conn)
            .with_context(|| format!("Database {:?} is not a question store", db_path))?;

        Ok(Self {
            db_path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory database with an empty catalog schema (for testing)
    pub fn new_in_memory() -> Result<Self> {
        debug!("Creating in-memory database");

        let conn =
            Connection::open_in_memory().context("Failed to create in-memory database")?;

        schema::create_tables(&conn)?;

        Ok(Self {
            db_path: PathBuf::from(":memory:"),
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Location the store was opened from
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Run `f` against the connection on the current thread
    pub fn execute<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .connection
            .lock()
            .map_err(|e| anyhow::anyhow!("Question store lock poisoned: {}", e))?;

        f(&conn)
    }

    /// Run `f` against the connection on tokio's blocking pool
    pub async fn execute_async<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.connection.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| anyhow::anyhow!("Question store lock poisoned: {}", e))?;

            f(&conn)
        })
        .await
        .context("Question store task panicked")?
    }

    /// Get catalog statistics
    pub fn stats(&self) -> Result<DatabaseStats> {
        self.execute(|conn| {
            let count = |table: &str| -> Result<i64> {
                let sql = format!("SELECT COUNT(*) FROM {}", table);
                Ok(conn.query_row(&sql, [], |row| row.get(0))?)
            };

            let file_size = if self.db_path.to_string_lossy() != ":memory:" {
                std::fs::metadata(&self.db_path)
                    .map(|m| m.len())
                    .unwrap_or(0)
            } else {
                0
            };

            Ok(DatabaseStats {
                question_count: count("questions")?,
                discipline_count: count("disciplines")?,
                language_count: count("languages")?,
                alternative_count: count("alternatives")?,
                file_size_bytes: file_size,
            })
        })
    }
}

/// Catalog statistics
#[derive(Debug, Clone)]
pub struct DatabaseStats {
    /// Number of questions
    pub question_count: i64,
    /// Number of disciplines
    pub discipline_count: i64,
    /// Number of languages
    pub language_count: i64,
    /// Number of alternatives across all questions
    pub alternative_count: i64,
    /// Database file size in bytes
    pub file_size_bytes: u64,
}

impl std::fmt::Display for DatabaseStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Questions: {}, Disciplines: {}, Languages: {}, Alternatives: {}, Size: {} KB",
            self.question_count,
            self.discipline_count,
            self.language_count,
            self.alternative_count,
            self.file_size_bytes / 1024
        )
    }
}
