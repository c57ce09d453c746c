/*!
 * Database schema definitions.
 *
 * The question store is produced by an external loader. This module knows
 * which tables the catalog reads, verifies that an opened store has them,
 * and can create the same layout for in-memory stores and test fixtures.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;

/// Tables the catalog reads from
pub const REQUIRED_TABLES: [&str; 5] = [
    "questions",
    "disciplines",
    "languages",
    "alternatives",
    "question_files",
];

/// Verify that every catalog table exists
pub fn verify_schema(conn: &Connection) -> Result<()> {
    for table in REQUIRED_TABLES {
        if !table_exists(conn, table)? {
            return Err(anyhow::anyhow!("Missing required table: {}", table));
        }
    }

    debug!("Question store schema verified");
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let exists: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            [table],
            |row| row.get(0),
        )
        .with_context(|| format!("Failed to check existence of table {}", table))?;

    Ok(exists)
}

/// Create all catalog tables, mirroring the loader's layout
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS exams (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            year INTEGER NOT NULL UNIQUE,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS disciplines (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            label TEXT NOT NULL,
            value TEXT NOT NULL UNIQUE,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS languages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            label TEXT NOT NULL,
            value TEXT NOT NULL UNIQUE,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );
        "#,
    )?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS questions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            index_number INTEGER NOT NULL,
            year INTEGER NOT NULL,
            discipline_id INTEGER REFERENCES disciplines(id),
            language_id INTEGER REFERENCES languages(id),
            context TEXT,
            alternatives_introduction TEXT,
            correct_alternative TEXT,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(year, index_number, discipline_id, language_id)
        );

        CREATE INDEX IF NOT EXISTS idx_questions_year ON questions(year);
        "#,
    )?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS alternatives (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            question_id INTEGER NOT NULL REFERENCES questions(id),
            letter TEXT NOT NULL,
            text TEXT NOT NULL,
            file_path TEXT,
            is_correct BOOLEAN NOT NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_alternatives_question ON alternatives(question_id);

        CREATE TABLE IF NOT EXISTS question_files (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            question_id INTEGER NOT NULL REFERENCES questions(id),
            file_path TEXT NOT NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_question_files_question ON question_files(question_id);
        "#,
    )?;

    info!("Question store schema created");
    Ok(())
}
